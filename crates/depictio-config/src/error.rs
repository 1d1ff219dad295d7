//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading and validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file does not exist.
    #[error("config file '{path}' not found: {hint}")]
    NotFound { path: String, hint: String },

    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse YAML.
    #[error("failed to parse YAML config: {0}")]
    ParseYaml(String),

    /// Missing required field.
    #[error("missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// A field is present but malformed.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The access token is past its expiry date.
    #[error("access token '{name}' expired at {expired_at}; generate a new token")]
    TokenExpired { name: String, expired_at: String },

    /// Two workflows share the same `{engine}/{name}` identity.
    #[error("workflow '{0}' is declared more than once")]
    DuplicateWorkflow(String),

    /// A declared workflow or data collection failed validation.
    #[error(transparent)]
    Descriptor(#[from] depictio_types::Error),
}

impl ConfigError {
    /// Whether this error means the credential itself is unusable.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ConfigError::TokenExpired { .. })
    }
}

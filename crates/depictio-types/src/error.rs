//! Error types for boundary validation of shared types.

use thiserror::Error;

/// Result type alias using the shared type error.
pub type Result<T> = std::result::Result<T, Error>;

/// Raised when a value fails validation at a crate boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("duplicate data collection tag '{tag}' in workflow '{workflow}'")]
    DuplicateTag { workflow: String, tag: String },
}

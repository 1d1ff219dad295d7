//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can stop a workflow or a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local descriptor is malformed; raised before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential rejected. No workflow can proceed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Declared shape differs from the catalog and updates are not allowed.
    #[error("Workflow '{workflow}' conflicts with the catalog: {message}")]
    Conflict { workflow: String, message: String },

    /// Catalog call failed.
    #[error("Remote error: {0}")]
    Remote(#[source] depictio_client::Error),
}

impl SyncError {
    /// Whether the error ends the run rather than a single workflow.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Config(_) | SyncError::Auth(_))
    }
}

impl From<depictio_client::Error> for SyncError {
    fn from(err: depictio_client::Error) -> Self {
        if err.is_auth_error() {
            SyncError::Auth(err.to_string())
        } else {
            SyncError::Remote(err)
        }
    }
}

impl From<depictio_types::Error> for SyncError {
    fn from(err: depictio_types::Error) -> Self {
        SyncError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_auth_error_maps_to_auth() {
        let err: SyncError = depictio_client::Error::Auth("token expired".to_string()).into();
        assert!(matches!(err, SyncError::Auth(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_client_api_error_maps_to_remote() {
        let err: SyncError = depictio_client::Error::Api {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, SyncError::Remote(_)));
        assert!(!err.is_fatal());
    }
}

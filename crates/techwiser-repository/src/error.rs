//! Error types for the repository layer

use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No record with the given id
    #[error("Not found: {id}")]
    NotFound { id: String },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API error (HTTP transport, unexpected status, unreadable body)
    #[error("API error: {0}")]
    ApiError(String),

    /// The storage backend reported a failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration is incomplete or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RepositoryError {
    /// Whether this error means the record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

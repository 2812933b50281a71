//! Error types for TechWiser core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// A generated file path escapes the project root or is empty
    #[error("Unsafe file path: {0}")]
    UnsafePath(String),

    /// Nothing to export
    #[error("Project has no files to export")]
    EmptyBundle,

    /// Archive writer failure
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

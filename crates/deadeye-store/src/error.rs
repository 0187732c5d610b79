//! Error types for persistence.

use thiserror::Error;

/// Errors that can occur while reading or writing records.
#[derive(Debug, Error)]
pub enum Error {
    /// The medium refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, Error>;

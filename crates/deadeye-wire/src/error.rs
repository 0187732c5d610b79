//! Error types for deadeye-wire

use thiserror::Error;

/// Relay decoding error
#[derive(Debug, Error)]
pub enum Error {
    /// Not JSON, or the wrong JSON types
    #[error("Malformed relay message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A field does not fit a dart
    #[error("Field {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    /// The source could not be read
    #[error("Source error: {0}")]
    Source(#[from] std::io::Error),
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, Error>;

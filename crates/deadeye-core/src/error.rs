//! Error types for deadeye-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Stage is locked: {0}")]
    Locked(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid dart: segment {segment} x{multiplier}")]
    InvalidDart { segment: u8, multiplier: u8 },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

//! Driver layer error types.

use thiserror::Error;

/// Errors raised while building a driver's effective configuration
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("Failed to parse driver config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

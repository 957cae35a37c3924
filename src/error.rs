//! Error types for spark-typewriter

use thiserror::Error;

/// Result type alias for spark-typewriter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when starting or hosting a typewriter.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected engine configuration (raised before any engine exists)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Terminal I/O error from the renderer or the run loop
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for configuration rejections.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_))
    }
}

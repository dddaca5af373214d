//! Error handling for authfed core.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for configuration operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration content is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration could not be read.
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns whether the error came from reading or decoding a file.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Parse(_))
    }
}

//! Provider error types.

use thiserror::Error;

/// Errors that can occur while registering or looking up providers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// A descriptor with the same id is already registered.
    #[error("provider already registered: {0}")]
    DuplicateProvider(String),

    /// Provider not found.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// Descriptor content is invalid.
    #[error("invalid provider descriptor: {0}")]
    InvalidDescriptor(String),
}

impl ProviderError {
    /// Creates an invalid descriptor error.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ProviderNotFound(_))
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

//! Session error types.

use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A required constructor input was not supplied.
    #[error("Missing required session input: {0}")]
    MissingInput(&'static str),

    /// The federated session belongs to a different parent session.
    #[error("Federated session for provider {0} belongs to another parent session")]
    ForeignParent(String),

    /// The parent session has been closed.
    #[error("Session closed: {0}")]
    Closed(String),
}

impl SessionError {
    /// Checks if this is a construction precondition violation.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingInput(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

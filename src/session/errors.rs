//! # Session Errors
//!
//! Error types for the page-load session.

use thiserror::Error;

use crate::query::QueryError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Failure reported by a data provider.
///
/// The session never retries; a failed trigger leaves the query state as it
/// was before the trigger, so the caller may simply repeat it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Dataset could not be read
    #[error("Failed to read dataset: {0}")]
    Io(String),

    /// Dataset was read but is not a list of records
    #[error("Malformed dataset: {0}")]
    Decode(String),

    /// Data source refused or is unreachable
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "PAGEFLOW_TRANSPORT_ERROR"
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e.to_string())
    }
}

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Invalid session configuration (fatal)
    #[error(transparent)]
    Configuration(#[from] QueryError),

    /// Data provider failed (retryable)
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Configuration(e) => e.code(),
            SessionError::Transport(e) => e.code(),
        }
    }

    /// Only transport failures may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Transport(_))
    }
}

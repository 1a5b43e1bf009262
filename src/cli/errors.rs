//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::query::{DescriptorError, QueryError};
use crate::session::{SessionError, TransportError};

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or page size error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Malformed request
    RequestError,
    /// Dataset could not be fetched
    TransportError,
    /// Async runtime could not start
    RuntimeError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PAGEFLOW_CONFIGURATION_ERROR",
            Self::IoError => "PAGEFLOW_CLI_IO_ERROR",
            Self::RequestError => "PAGEFLOW_CLI_REQUEST_ERROR",
            Self::TransportError => "PAGEFLOW_TRANSPORT_ERROR",
            Self::RuntimeError => "PAGEFLOW_CLI_RUNTIME_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {message}", .code.code())]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn request_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RequestError, msg)
    }

    pub fn runtime_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RuntimeError, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::request_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<DescriptorError> for CliError {
    fn from(e: DescriptorError) -> Self {
        match e {
            DescriptorError::Invalid(e) => e.into(),
            DescriptorError::Malformed(e) => e.into(),
        }
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        Self::new(CliErrorCode::TransportError, e.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Configuration(e) => e.into(),
            SessionError::Transport(e) => e.into(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_code() {
        let err = CliError::from(QueryError::InvalidPageSize(0));
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert!(err.to_string().starts_with("PAGEFLOW_CONFIGURATION_ERROR: "));
    }

    #[test]
    fn test_session_error_mapping() {
        let err = CliError::from(SessionError::Transport(TransportError::Io("gone".into())));
        assert_eq!(err.code_str(), "PAGEFLOW_TRANSPORT_ERROR");
        assert!(err.message().contains("gone"));
    }
}

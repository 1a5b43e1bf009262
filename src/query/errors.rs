//! Query error types
//!
//! A query can only be malformed in one way that the engine refuses to
//! tolerate: a page size that is not positive. Unknown fields and tokens are
//! accepted and simply match nothing.

use thiserror::Error;

/// Result type for query construction and execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Page size is zero or negative
    #[error("Invalid page size: {0} (must be > 0)")]
    InvalidPageSize(i64),

    /// Page index is negative
    #[error("Invalid page index: {0} (must be >= 0)")]
    InvalidPage(i64),
}

impl QueryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidPageSize(_) | QueryError::InvalidPage(_) => {
                "PAGEFLOW_CONFIGURATION_ERROR"
            }
        }
    }

    /// Configuration errors are never retried
    pub fn is_fatal(&self) -> bool {
        true
    }
}

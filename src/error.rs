//! Error types for query normalization with programmatic codes.
//!
//! Every fallible operation in this crate reports a [`QueryError`] carrying
//! an [`ErrorCode`] so callers can branch without string matching:
//!
//! ```rust
//! use quarry_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::invalid_parameter("bad regex flags");
//! assert_eq!(err.code, ErrorCode::InvalidParameter);
//! assert_eq!(err.code.code(), "Q5003");
//! ```
//!
//! Connection-side failures use the separate
//! [`ConnectionError`](crate::connection::ConnectionError) enum.

use std::fmt;

use thiserror::Error;

/// Result type for query normalization operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
///
/// Codes follow the pattern `Q{category}{number}`: 1xxx for filter/include
/// shape errors, 5xxx for invalid parameters, 9xxx for internal faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid filter or where clause (Q1003).
    InvalidFilter = 1003,
    /// Invalid include specification (Q1004).
    InvalidInclude = 1004,
    /// Invalid parameter (Q5003).
    InvalidParameter = 5003,
    /// Internal error (Q9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "Q1003").
    pub fn code(&self) -> String {
        format!("Q{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidFilter => "Invalid filter condition",
            Self::InvalidInclude => "Invalid include specification",
            Self::InvalidParameter => "Invalid parameter",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An error produced while normalizing or merging query input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct QueryError {
    /// Machine-readable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl QueryError {
    /// Create an error with an explicit code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A malformed where clause or filter value.
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFilter, message)
    }

    /// An include specification with an unsupported shape.
    pub fn invalid_include(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInclude, message)
    }

    /// An argument outside the accepted domain.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameter, message)
    }

    /// An invariant violation inside the crate itself.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::InvalidFilter.code(), "Q1003");
        assert_eq!(ErrorCode::InvalidInclude.code(), "Q1004");
        assert_eq!(ErrorCode::InvalidParameter.code(), "Q5003");
        assert_eq!(ErrorCode::Internal.code(), "Q9001");
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::invalid_filter("unexpected null value");
        assert_eq!(err.to_string(), "Q1003: unexpected null value");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(
            ErrorCode::InvalidParameter.description(),
            "Invalid parameter"
        );
    }

    #[test]
    fn test_constructors_set_codes() {
        assert_eq!(
            QueryError::invalid_include("x").code,
            ErrorCode::InvalidInclude
        );
        assert_eq!(QueryError::internal("x").code, ErrorCode::Internal);
    }
}

//! Error types for memoization
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Memoize Error Enum ==
/// Raised when a memoized wrapper is built from unusable options.
///
/// Errors produced by the wrapped function itself never take this shape: they
/// are handed back to the caller untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoizeError {
    /// An option value has the wrong shape (e.g. a NaN time-to-live)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An option value is well-formed but not allowed (e.g. a negative time-to-live)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// == Result Type Alias ==
/// Convenience Result type for wrapper construction.
pub type Result<T> = std::result::Result<T, MemoizeError>;

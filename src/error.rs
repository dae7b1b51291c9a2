//! Error types for the Tollgate limiter.

use thiserror::Error;

/// Main error type for Tollgate operations.
#[derive(Error, Debug)]
pub enum TollgateError {
    /// Raw limit value outside the representable range
    #[error("invalid limit value: {0}")]
    InvalidLimit(i64),

    /// A per-group limit references an undeclared accounting group
    #[error("unknown accounting group: {0}")]
    UnknownGroup(String),

    /// The base limit is always in effect and cannot be cleared
    #[error("base limit cannot be removed")]
    ImmutableBaseLimit,

    /// Limiter construction with a zero-length window period
    #[error("limit period must be non-zero")]
    InvalidPeriod,

    /// Configuration-document errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Tollgate operations.
pub type Result<T> = std::result::Result<T, TollgateError>;

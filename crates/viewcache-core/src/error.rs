//! Error types for `viewcache`.
//!
//! Cache operations are total once a cache exists, so the taxonomy is small:
//! construction can be refused and configuration can fail to load.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for `viewcache` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `viewcache` operations.
///
/// Error codes follow the pattern `VCACHE-XXX` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument supplied to a constructor (VCACHE-001).
    #[error("[VCACHE-001] Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error (VCACHE-002).
    #[error("[VCACHE-002] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "VCACHE-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "VCACHE-001",
            Self::Config(_) => "VCACHE-002",
        }
    }

    /// Returns true if this error is recoverable.
    ///
    /// A refused construction is a programming error on the caller's side and
    /// is never retried.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidArgument(_))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

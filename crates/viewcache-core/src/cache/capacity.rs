//! Cache size limits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

/// Maximum number of entries a cache may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCapacity {
    /// At most this many entries.
    Bounded(NonZeroUsize),
    /// No limit; reported as `usize::MAX`.
    Unbounded,
}

impl CacheCapacity {
    /// A bounded capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `max_entries` is zero.
    pub fn bounded(max_entries: usize) -> Result<Self> {
        NonZeroUsize::new(max_entries)
            .map(Self::Bounded)
            .ok_or_else(|| Self::rejected(0))
    }

    /// Reads a config value where `0` means unbounded.
    #[must_use]
    pub fn from_max_entries(max_entries: usize) -> Self {
        NonZeroUsize::new(max_entries).map_or(Self::Unbounded, Self::Bounded)
    }

    /// Maximum number of entries, `usize::MAX` when unbounded.
    #[must_use]
    pub fn max_entries(self) -> usize {
        self.limit().get()
    }

    /// Whether there is no limit.
    #[must_use]
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    pub(crate) fn limit(self) -> NonZeroUsize {
        match self {
            Self::Bounded(n) => n,
            Self::Unbounded => NonZeroUsize::MAX,
        }
    }

    fn rejected(requested: i64) -> Error {
        Error::InvalidArgument(format!(
            "max cache size must be positive, got {requested}"
        ))
    }
}

impl TryFrom<i64> for CacheCapacity {
    type Error = Error;

    /// Accepts any positive size; `i64::MAX` and anything at or above
    /// `usize::MAX` are treated as unbounded.
    fn try_from(max_size: i64) -> Result<Self> {
        if max_size <= 0 {
            return Err(Self::rejected(max_size));
        }
        if max_size == i64::MAX {
            return Ok(Self::Unbounded);
        }
        match usize::try_from(max_size) {
            Ok(usize::MAX) | Err(_) => Ok(Self::Unbounded),
            Ok(n) => Self::bounded(n),
        }
    }
}

impl fmt::Display for CacheCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

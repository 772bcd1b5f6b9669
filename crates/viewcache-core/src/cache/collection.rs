//! Column data cache for differential view reads.
//!
//! A differential lookup returns full column data only for notes changed
//! since the caller's diff time; unchanged notes come back as stubs. This
//! cache keeps the last-known column data per note so stubs can be filled
//! locally.
//!
//! Cached data is only valid for the (read mask, diff time) baseline it was
//! read under. Absorbing values for any other baseline wipes the cache first.

#![allow(clippy::cast_precision_loss)] // Precision loss acceptable for hit rate calculation

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::capacity::CacheCapacity;
use super::lru::BoundedLru;
use super::snapshot::CacheSnapshot;
use crate::baseline::{DiffTime, ReadMask};
use crate::config::CacheConfig;
use crate::entry::ViewEntry;
use crate::error::Result;

/// Cache statistics for monitoring.
///
/// All counters are lifetime-cumulative; [`CollectionDataCache::flush`] does
/// not reset them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Stubs filled from the cache.
    pub hits: u64,
    /// Stubs looked up but not cached.
    pub misses: u64,
    /// Entries evicted by LRU pressure.
    pub evictions: u64,
    /// Wipes forced by a baseline change.
    pub invalidations: u64,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Outcome of [`CollectionDataCache::add_cache_values`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheUpdate {
    /// Previous contents were dropped because the baseline changed.
    pub invalidated: bool,
    /// Entries inserted or overwritten.
    pub inserted: usize,
    /// Entries evicted to stay within capacity.
    pub evicted: usize,
}

struct CacheState<V> {
    /// `None` until the first values are absorbed, and again after a flush.
    baseline: Option<(ReadMask, DiffTime)>,
    entries: BoundedLru<u32, V>,
}

/// Thread-safe LRU cache of view column data keyed by note id.
pub struct CollectionDataCache<V> {
    capacity: CacheCapacity,
    inner: RwLock<CacheState<V>>,
    /// Mirrors `entries.len()`; written under the write lock only.
    len: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl<V: Clone> CollectionDataCache<V> {
    /// Creates a cache holding at most `max_size` entries.
    ///
    /// `i64::MAX` requests an unbounded cache.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if `max_size <= 0`.
    pub fn new(max_size: i64) -> Result<Self> {
        Ok(Self::with_capacity(CacheCapacity::try_from(max_size)?))
    }

    /// Creates a cache with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: CacheCapacity) -> Self {
        Self {
            capacity,
            inner: RwLock::new(CacheState {
                baseline: None,
                entries: BoundedLru::new(capacity.limit()),
            }),
            len: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Creates a cache without a size limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_capacity(CacheCapacity::Unbounded)
    }

    /// Creates a cache sized by the `[cache]` config section.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_capacity(config.capacity())
    }

    /// Current number of cached entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Configured maximum number of entries (`usize::MAX` when unbounded).
    #[must_use]
    pub fn max_cache_size(&self) -> usize {
        self.capacity.max_entries()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> CacheCapacity {
        self.capacity
    }

    /// Number of stubs filled from the cache since creation.
    #[must_use]
    pub fn usage_stats(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Read mask of the current baseline.
    #[must_use]
    pub fn read_mask(&self) -> Option<ReadMask> {
        self.inner.read().baseline.map(|(mask, _)| mask)
    }

    /// Diff time of the current baseline.
    ///
    /// This is the "since" time to pass to the next differential lookup.
    #[must_use]
    pub fn diff_time(&self) -> Option<DiffTime> {
        self.inner.read().baseline.map(|(_, time)| time)
    }

    /// Whether absorbing values for this pair would keep the cached entries.
    #[must_use]
    pub fn is_baseline(&self, read_mask: ReadMask, diff_time: DiffTime) -> bool {
        match self.inner.read().baseline {
            Some(current) => current == (read_mask, diff_time),
            None => true,
        }
    }

    /// Whether column data for `note_id` is cached.
    #[must_use]
    pub fn contains(&self, note_id: u32) -> bool {
        self.inner.read().entries.contains(&note_id)
    }

    /// Drops all entries and the baseline.
    pub fn flush(&self) {
        let mut state = self.inner.write();
        let dropped = state.entries.len();
        state.entries.clear();
        state.baseline = None;
        self.len.store(0, Ordering::Release);
        tracing::debug!(dropped, "view data cache flushed");
    }

    /// Absorbs the column data of a lookup read under `read_mask`/`diff_time`.
    ///
    /// If a different baseline was recorded, all cached entries are dropped
    /// first. Entries carrying column data are then inserted or overwritten
    /// (becoming most recently used); stubs are skipped.
    pub fn add_cache_values<E>(
        &self,
        read_mask: ReadMask,
        diff_time: DiffTime,
        entries: &[E],
    ) -> CacheUpdate
    where
        E: ViewEntry<Data = V>,
    {
        let mut update = CacheUpdate::default();
        let mut state = self.inner.write();

        let baseline = (read_mask, diff_time);
        let previous = state.baseline;
        if let Some(previous) = previous {
            if previous != baseline {
                tracing::debug!(
                    old_read_mask = previous.0.bits(),
                    old_diff_time = %previous.1,
                    new_read_mask = read_mask.bits(),
                    new_diff_time = %diff_time,
                    dropped = state.entries.len(),
                    "view data cache baseline changed, dropping cached entries"
                );
                state.entries.clear();
                update.invalidated = true;
                self.invalidations.fetch_add(1, Ordering::Relaxed);
            }
        }
        state.baseline = Some(baseline);

        for entry in entries.iter().filter(|e| e.has_any_column_values()) {
            let note_id = entry.note_id();
            if let Some((evicted_id, _)) = state.entries.insert(note_id, entry.cacheable_data()) {
                tracing::trace!(evicted_id, "evicted least recently used view entry");
                update.evicted += 1;
            }
            update.inserted += 1;
        }

        self.evictions
            .fetch_add(update.evicted as u64, Ordering::Relaxed);
        self.len.store(state.entries.len(), Ordering::Release);
        update
    }

    /// Fills stub entries in place from cached column data.
    ///
    /// Entries that already carry column data are left untouched, as are
    /// stubs whose note is not cached. Returns the number of stubs filled.
    pub fn populate_entry_stubs_with_data<E>(&self, entries: &mut [E]) -> usize
    where
        E: ViewEntry<Data = V>,
    {
        if entries.iter().all(ViewEntry::has_any_column_values) {
            return 0;
        }

        let state = self.inner.read();
        let mut filled = 0usize;
        let mut missed = 0usize;

        for entry in entries.iter_mut().filter(|e| !e.has_any_column_values()) {
            match state.entries.peek(&entry.note_id()) {
                Some(data) => {
                    entry.apply_cached_data(data.clone());
                    filled += 1;
                }
                None => missed += 1,
            }
        }
        drop(state);

        self.hits.fetch_add(filled as u64, Ordering::Relaxed);
        self.misses.fetch_add(missed as u64, Ordering::Relaxed);
        filled
    }

    /// Note ids of stubs that the cache cannot fill.
    ///
    /// The caller has to read these notes again with full column data.
    #[must_use]
    pub fn missing_stub_ids<E>(&self, entries: &[E]) -> Vec<u32>
    where
        E: ViewEntry<Data = V>,
    {
        let mut stubs = entries
            .iter()
            .filter(|e| !e.has_any_column_values())
            .map(ViewEntry::note_id)
            .peekable();
        if stubs.peek().is_none() {
            return Vec::new();
        }

        let state = self.inner.read();
        let missing = stubs.filter(|id| !state.entries.contains(id)).collect();
        missing
    }

    /// Copies the baseline and all cached entries.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot<V> {
        let state = self.inner.read();
        let entries = state
            .entries
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect();
        CacheSnapshot::new(state.baseline, entries)
    }

    /// Alias of [`CollectionDataCache::snapshot`].
    #[must_use]
    pub fn cache_state(&self) -> CacheSnapshot<V> {
        self.snapshot()
    }
}

impl<V> fmt::Debug for CollectionDataCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDataCache")
            .field("capacity", &self.capacity)
            .field("size", &self.len.load(Ordering::Relaxed))
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

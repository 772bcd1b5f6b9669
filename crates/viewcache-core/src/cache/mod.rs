//! View entry data cache.
//!
//! - [`CollectionDataCache`]: per-collection column data cache for
//!   differential reads, with LRU eviction and baseline invalidation
//! - [`BoundedLru`]: the unsynchronized LRU store behind it
//! - [`CacheSnapshot`]: detached copy of a cache's state
//!
//! # Thread-Safety
//!
//! `CollectionDataCache` guards its store and baseline with a single
//! `parking_lot::RwLock`. Writers (`add_cache_values`, `flush`) are exclusive;
//! readers (`populate_entry_stubs_with_data`, `snapshot`, `missing_stub_ids`)
//! run in parallel. Counters are atomics and may be read without the lock.

mod capacity;
mod collection;
mod lru;
mod snapshot;

pub use capacity::CacheCapacity;
pub use collection::{CacheStats, CacheUpdate, CollectionDataCache};
pub use lru::{BoundedLru, Iter};
pub use snapshot::CacheSnapshot;

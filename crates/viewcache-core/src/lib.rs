//! # `viewcache` Core
//!
//! Column data cache for differential reads of Domino/Notes views.
//!
//! A differential NIF lookup, given the diff time of a previous read, returns
//! full column data only for notes changed since then and bare stubs for the
//! rest. [`CollectionDataCache`] keeps the last-known column data of each note
//! so those stubs can be filled without reading the notes again.
//!
//! ## Quick Start
//!
//! ```rust
//! use viewcache_core::{
//!     CollectionDataCache, CollectionEntry, ColumnSnapshot, ColumnValue, DiffTime, ReadFlag,
//!     ReadMask,
//! };
//!
//! let cache: CollectionDataCache<ColumnSnapshot> = CollectionDataCache::new(1_000)?;
//! let mask = ReadMask::from(ReadFlag::NoteId).with(ReadFlag::SummaryValues);
//!
//! // First read: everything comes back with data.
//! let first = vec![CollectionEntry::with_columns(42, vec![ColumnValue::Text("Hello".into())])];
//! cache.add_cache_values(mask, DiffTime::from_u64(1), &first);
//!
//! // Differential read: note 42 is unchanged and arrives as a stub.
//! let mut second = vec![CollectionEntry::stub(42)];
//! cache.populate_entry_stubs_with_data(&mut second);
//!
//! assert_eq!(second[0].columns(), first[0].columns());
//! assert_eq!(cache.usage_stats(), 1);
//! # Ok::<(), viewcache_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::significant_drop_tightening)]

pub mod baseline;
pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod logging;

pub use baseline::{DiffTime, ReadFlag, ReadMask};
pub use cache::{
    BoundedLru, CacheCapacity, CacheSnapshot, CacheStats, CacheUpdate, CollectionDataCache,
};
pub use config::{CacheConfig, ConfigError, LoggingConfig, ViewCacheConfig};
pub use entry::{CollectionEntry, ColumnSnapshot, ColumnValue, ViewEntry};
pub use error::{Error, Result};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;

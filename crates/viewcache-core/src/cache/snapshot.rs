//! Point-in-time export of a [`super::CollectionDataCache`].

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::baseline::{DiffTime, ReadMask};

/// Copy of a cache's baseline and contents, detached from the live store.
///
/// Entries are ordered from least to most recently used at the time the
/// snapshot was taken. Serialized with flat `read_mask` / `diff_time` /
/// `entries` fields; deserializing rejects a baseline with only one of the
/// two set.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot<V> {
    baseline: Option<(ReadMask, DiffTime)>,
    entries: IndexMap<u32, V>,
}

#[derive(Serialize)]
struct SnapshotRef<'a, V> {
    read_mask: Option<ReadMask>,
    diff_time: Option<DiffTime>,
    entries: &'a IndexMap<u32, V>,
}

#[derive(Deserialize)]
struct SnapshotRepr<V> {
    read_mask: Option<ReadMask>,
    diff_time: Option<DiffTime>,
    entries: IndexMap<u32, V>,
}

impl<V: Serialize> Serialize for CacheSnapshot<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SnapshotRef {
            read_mask: self.read_mask(),
            diff_time: self.diff_time(),
            entries: &self.entries,
        }
        .serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CacheSnapshot<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SnapshotRepr::<V>::deserialize(deserializer)?;
        let baseline = match (repr.read_mask, repr.diff_time) {
            (Some(mask), Some(time)) => Some((mask, time)),
            (None, None) => None,
            (mask, time) => {
                return Err(D::Error::custom(format!(
                    "read_mask and diff_time must be set together, got {mask:?} and {time:?}"
                )));
            }
        };
        Ok(Self::new(baseline, repr.entries))
    }
}

impl<V> CacheSnapshot<V> {
    pub(crate) fn new(
        baseline: Option<(ReadMask, DiffTime)>,
        entries: IndexMap<u32, V>,
    ) -> Self {
        Self { baseline, entries }
    }

    /// Read mask of the cached baseline, `None` for a fresh cache.
    #[must_use]
    pub fn read_mask(&self) -> Option<ReadMask> {
        self.baseline.map(|(mask, _)| mask)
    }

    /// Diff time of the cached baseline, `None` for a fresh cache.
    #[must_use]
    pub fn diff_time(&self) -> Option<DiffTime> {
        self.baseline.map(|(_, time)| time)
    }

    /// Cached column data by note id.
    #[must_use]
    pub fn entries(&self) -> &IndexMap<u32, V> {
        &self.entries
    }

    /// Cached column data for `note_id`.
    #[must_use]
    pub fn get(&self, note_id: u32) -> Option<&V> {
        self.entries.get(&note_id)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes the entry map.
    #[must_use]
    pub fn into_entries(self) -> IndexMap<u32, V> {
        self.entries
    }
}

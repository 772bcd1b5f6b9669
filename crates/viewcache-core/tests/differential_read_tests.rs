//! End-to-end differential reads against a simulated view lookup.
//!
//! `FakeView` stands in for the native lookup: given a diff time it returns
//! stubs for notes unchanged since then and full entries for the rest.

use std::collections::BTreeMap;

use viewcache_core::{
    CollectionDataCache, CollectionEntry, ColumnSnapshot, ColumnValue, DiffTime, ReadFlag,
    ReadMask,
};

struct FakeView {
    /// note id -> (modified at, title)
    notes: BTreeMap<u32, (u64, String)>,
    clock: u64,
}

impl FakeView {
    fn new(count: u32) -> Self {
        let notes = (1..=count).map(|id| (id, (1, format!("doc {id}")))).collect();
        Self { notes, clock: 1 }
    }

    fn edit(&mut self, id: u32, title: &str) {
        self.clock += 1;
        self.notes.insert(id, (self.clock, title.to_string()));
    }

    fn delete(&mut self, id: u32) {
        self.clock += 1;
        self.notes.remove(&id);
    }

    /// Returns the entries plus the diff time to use for the next read.
    fn read(&self, since: Option<DiffTime>) -> (Vec<CollectionEntry>, DiffTime) {
        let entries = self
            .notes
            .iter()
            .map(|(&id, (modified, title))| match since {
                Some(since) if *modified <= since.to_u64() => CollectionEntry::stub(id),
                _ => CollectionEntry::with_columns(id, vec![ColumnValue::Text(title.clone())]),
            })
            .collect();
        (entries, DiffTime::from_u64(self.clock))
    }
}

fn titles(entries: &[CollectionEntry]) -> Vec<Option<String>> {
    entries
        .iter()
        .map(|e| match e.column(0) {
            Some(ColumnValue::Text(t)) => Some(t.clone()),
            _ => None,
        })
        .collect()
}

fn summary_mask() -> ReadMask {
    ReadMask::from(ReadFlag::NoteId).with(ReadFlag::SummaryValues)
}

/// One read cycle the way a view reader drives the cache.
fn differential_read(
    view: &FakeView,
    cache: &CollectionDataCache<ColumnSnapshot>,
    mask: ReadMask,
) -> Vec<CollectionEntry> {
    let since = if cache.read_mask() == Some(mask) {
        cache.diff_time()
    } else {
        None
    };
    let (mut entries, next) = view.read(since);

    cache.populate_entry_stubs_with_data(&mut entries);
    if !cache.missing_stub_ids(&entries).is_empty() {
        // Evicted notes cannot be filled: do a full read.
        let (full, next) = view.read(None);
        entries = full;
        cache.flush();
        cache.add_cache_values(mask, next, &entries);
        return entries;
    }
    cache.add_cache_values(mask, next, &entries);
    entries
}

#[test]
fn test_second_read_served_from_cache() {
    // Arrange
    let view = FakeView::new(5);
    let cache = CollectionDataCache::new(100).expect("valid size");

    // Act
    let first = differential_read(&view, &cache, summary_mask());
    let second = differential_read(&view, &cache, summary_mask());

    // Assert
    assert_eq!(titles(&first), titles(&second));
    assert_eq!(cache.usage_stats(), 5);
    assert_eq!(cache.size(), 5);
}

#[test]
fn test_edits_replace_cached_columns() {
    let mut view = FakeView::new(3);
    let cache = CollectionDataCache::new(100).expect("valid size");
    differential_read(&view, &cache, summary_mask());

    view.edit(2, "edited");
    let entries = differential_read(&view, &cache, summary_mask());

    assert_eq!(
        titles(&entries),
        vec![
            Some("doc 1".to_string()),
            Some("edited".to_string()),
            Some("doc 3".to_string()),
        ]
    );
    assert_eq!(cache.usage_stats(), 2);
}

#[test]
fn test_deleted_note_lingers_but_is_never_returned() {
    let mut view = FakeView::new(3);
    let cache = CollectionDataCache::new(100).expect("valid size");
    differential_read(&view, &cache, summary_mask());

    view.delete(3);
    let entries = differential_read(&view, &cache, summary_mask());

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| !e.is_stub()));
}

#[test]
fn test_changed_read_mask_starts_over() {
    let view = FakeView::new(4);
    let cache = CollectionDataCache::new(100).expect("valid size");
    differential_read(&view, &cache, summary_mask());

    let other = summary_mask().with(ReadFlag::IndexPosition);
    let entries = differential_read(&view, &cache, other);

    assert!(entries.iter().all(|e| !e.is_stub()));
    assert_eq!(cache.usage_stats(), 0);
    assert_eq!(cache.read_mask(), Some(other));
    assert_eq!(cache.stats().invalidations, 1);
}

#[test]
fn test_undersized_cache_falls_back_to_full_read() {
    let view = FakeView::new(10);
    let cache = CollectionDataCache::new(4).expect("valid size");
    differential_read(&view, &cache, summary_mask());

    let entries = differential_read(&view, &cache, summary_mask());

    assert_eq!(entries.len(), 10);
    assert!(entries.iter().all(|e| !e.is_stub()));
    assert_eq!(cache.size(), 4);
}

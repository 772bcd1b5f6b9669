//! View entries as seen by the cache.
//!
//! The lookup layer produces entries; the cache only needs to know an
//! entry's note id, whether it carries column data, and how to move that data
//! in and out. [`ViewEntry`] is that contract. [`CollectionEntry`] is the
//! entry type used by the view reader in this crate.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Contract between the cache and the entries a view lookup returns.
pub trait ViewEntry {
    /// Cacheable snapshot of this entry's column values.
    type Data: Clone;

    /// Note identifier, stable within the collection.
    fn note_id(&self) -> u32;

    /// Whether the entry carries at least one column value.
    ///
    /// Entries without column values are stubs.
    fn has_any_column_values(&self) -> bool;

    /// Extracts the column values for caching.
    fn cacheable_data(&self) -> Self::Data;

    /// Takes over cached column values, turning a stub into a full entry.
    fn apply_cached_data(&mut self, data: Self::Data);
}

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColumnValue {
    /// Text.
    Text(String),
    /// Number.
    Number(f64),
    /// Date/time as raw ticks.
    DateTime(i64),
    /// Text list.
    TextList(Vec<String>),
    /// Number list.
    NumberList(Vec<f64>),
    /// Column present but without a value.
    Empty,
}

/// Immutable, shareable column values of one entry.
pub type ColumnSnapshot = Arc<[ColumnValue]>;

/// A document entry of a view read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    note_id: u32,
    position: Option<String>,
    columns: Option<ColumnSnapshot>,
}

impl CollectionEntry {
    /// Creates an entry that carries column values.
    pub fn with_columns(note_id: u32, columns: impl Into<ColumnSnapshot>) -> Self {
        Self {
            note_id,
            position: None,
            columns: Some(columns.into()),
        }
    }

    /// Creates a stub: the lookup reported the note unchanged and sent no
    /// column values.
    #[must_use]
    pub fn stub(note_id: u32) -> Self {
        Self {
            note_id,
            position: None,
            columns: None,
        }
    }

    /// Sets the collation position (e.g. `"1.2.3"`).
    #[must_use]
    pub fn at_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Collation position, if it was read.
    #[must_use]
    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    /// Column values, `None` for an unpopulated stub.
    #[must_use]
    pub fn columns(&self) -> Option<&[ColumnValue]> {
        self.columns.as_deref()
    }

    /// Column value at `index`.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ColumnValue> {
        self.columns.as_ref()?.get(index)
    }

    /// Whether this entry is still a stub.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        !self.has_any_column_values()
    }
}

impl ViewEntry for CollectionEntry {
    type Data = ColumnSnapshot;

    fn note_id(&self) -> u32 {
        self.note_id
    }

    fn has_any_column_values(&self) -> bool {
        self.columns.as_ref().is_some_and(|c| !c.is_empty())
    }

    fn cacheable_data(&self) -> ColumnSnapshot {
        self.columns.clone().unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn apply_cached_data(&mut self, data: ColumnSnapshot) {
        self.columns = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ColumnValue {
        ColumnValue::Text(s.to_string())
    }

    #[test]
    fn test_stub_has_no_column_values() {
        let entry = CollectionEntry::stub(7);

        assert!(entry.is_stub());
        assert!(entry.columns().is_none());
        assert_eq!(entry.note_id(), 7);
    }

    #[test]
    fn test_empty_column_vector_counts_as_stub() {
        let entry = CollectionEntry::with_columns(7, Vec::new());

        assert!(!entry.has_any_column_values());
    }

    #[test]
    fn test_partial_columns_count_as_data() {
        let entry = CollectionEntry::with_columns(7, vec![ColumnValue::Empty, text("b")]);

        assert!(entry.has_any_column_values());
        assert_eq!(entry.column(1), Some(&text("b")));
        assert_eq!(entry.column(5), None);
    }

    #[test]
    fn test_apply_cached_data_shares_snapshot() {
        let source = CollectionEntry::with_columns(9, vec![text("a"), ColumnValue::Number(1.5)]);
        let data = source.cacheable_data();
        let mut stub = CollectionEntry::stub(9).at_position("1.2");

        stub.apply_cached_data(Arc::clone(&data));

        assert!(!stub.is_stub());
        assert_eq!(stub.columns(), source.columns());
        assert_eq!(stub.position(), Some("1.2"));
        assert_eq!(Arc::strong_count(&data), 3);
    }

    #[test]
    fn test_column_value_serializes_tagged() {
        let json = serde_json::to_string(&ColumnValue::TextList(vec!["x".into()]))
            .expect("serialize");

        assert_eq!(json, r#"{"type":"text_list","value":["x"]}"#);
    }
}

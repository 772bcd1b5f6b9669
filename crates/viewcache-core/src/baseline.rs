//! Baseline identity of a differential view read.
//!
//! A cache's contents are only meaningful relative to the request that
//! produced them: which data categories were read ([`ReadMask`]) and which
//! snapshot the lookup was relative to ([`DiffTime`]). Both compare by value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single data category requested from a view lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFlag {
    /// Note identifier.
    NoteId,
    /// Universal note identifier.
    NoteUnid,
    /// Note class.
    NoteClass,
    /// Sibling count.
    IndexSiblings,
    /// Child count.
    IndexChildren,
    /// Descendant count.
    IndexDescendants,
    /// Whether any descendant is unread.
    IndexAnyUnread,
    /// Indent levels of response hierarchies.
    IndentLevels,
    /// Full-text search score.
    Score,
    /// Unread state of the entry itself.
    IndexUnread,
    /// Collection statistics.
    CollectionStats,
    /// Collation position.
    IndexPosition,
    /// Column values as an item-value table.
    SummaryValues,
    /// Column values with item names.
    Summary,
}

impl ReadFlag {
    /// All flags, in bit order.
    pub const ALL: [Self; 14] = [
        Self::NoteId,
        Self::NoteUnid,
        Self::NoteClass,
        Self::IndexSiblings,
        Self::IndexChildren,
        Self::IndexDescendants,
        Self::IndexAnyUnread,
        Self::IndentLevels,
        Self::CollectionStats,
        Self::Score,
        Self::IndexUnread,
        Self::SummaryValues,
        Self::IndexPosition,
        Self::Summary,
    ];

    /// Bit assigned to this flag.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::NoteId => 0x0001,
            Self::NoteUnid => 0x0002,
            Self::NoteClass => 0x0004,
            Self::IndexSiblings => 0x0008,
            Self::IndexChildren => 0x0010,
            Self::IndexDescendants => 0x0020,
            Self::IndexAnyUnread => 0x0040,
            Self::IndentLevels => 0x0080,
            Self::CollectionStats => 0x0100,
            Self::Score => 0x0200,
            Self::IndexUnread => 0x0400,
            Self::SummaryValues => 0x2000,
            Self::IndexPosition => 0x4000,
            Self::Summary => 0x8000,
        }
    }

    /// Whether this flag requests column data.
    #[must_use]
    pub const fn reads_columns(self) -> bool {
        matches!(self, Self::SummaryValues | Self::Summary)
    }
}

/// A set of [`ReadFlag`]s, compared by membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadMask(u32);

impl ReadMask {
    /// Creates an empty mask.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Creates a mask from raw bits; unknown bits are kept.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits of this mask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns this mask with `flag` added.
    #[must_use]
    pub const fn with(self, flag: ReadFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    /// Adds `flag` in place.
    pub fn insert(&mut self, flag: ReadFlag) {
        self.0 |= flag.bit();
    }

    /// Removes `flag` in place.
    pub fn remove(&mut self, flag: ReadFlag) {
        self.0 &= !flag.bit();
    }

    /// Whether `flag` is part of this mask.
    #[must_use]
    pub const fn contains(self, flag: ReadFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Whether the mask is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any flag requests column data.
    #[must_use]
    pub fn reads_columns(self) -> bool {
        self.iter().any(ReadFlag::reads_columns)
    }

    /// Iterates known flags set in this mask, in bit order.
    pub fn iter(self) -> impl Iterator<Item = ReadFlag> {
        ReadFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl FromIterator<ReadFlag> for ReadMask {
    fn from_iter<I: IntoIterator<Item = ReadFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl From<ReadFlag> for ReadMask {
    fn from(flag: ReadFlag) -> Self {
        Self::empty().with(flag)
    }
}

/// Opaque timestamp identifying the snapshot a differential read is
/// relative to.
///
/// Stored as the two raw words the native layer hands out; the cache never
/// interprets it as a wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffTime {
    innards: [u32; 2],
}

impl DiffTime {
    /// Creates a diff time from its raw words.
    #[must_use]
    pub const fn from_innards(innards: [u32; 2]) -> Self {
        Self { innards }
    }

    /// Raw words of this diff time.
    #[must_use]
    pub const fn innards(self) -> [u32; 2] {
        self.innards
    }

    /// Packs both words into a single `u64` (high word first).
    #[must_use]
    pub const fn to_u64(self) -> u64 {
        ((self.innards[1] as u64) << 32) | self.innards[0] as u64
    }

    /// Inverse of [`DiffTime::to_u64`].
    #[must_use]
    pub const fn from_u64(packed: u64) -> Self {
        Self {
            innards: [packed as u32, (packed >> 32) as u32],
        }
    }
}

impl fmt::Display for DiffTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}:{:08x}", self.innards[1], self.innards[0])
    }
}

// ============================================================
// Layer 3 — Song Domain Types
// ============================================================
// A SongRecord is one row of the lyrics table after parsing.
// A Chunk is a bounded, ordered batch of records read from the
// source file and processed as one unit.
//
// Records are never mutated after parsing except for their
// `lyrics` field, which the cleaner normalises in place.

use serde::{Deserialize, Serialize};

/// One song as read from a lyrics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub title:  String,
    pub artist: String,
    /// Categorical genre tag, e.g. "pop" or "misc"
    pub genre:  String,
    pub year:   i32,
    /// Popularity count; absent in some tables
    pub views:  Option<u64>,
    /// Free text lyrics. Empty when the raw field was missing
    /// or could not be decoded.
    pub lyrics: String,
}

impl SongRecord {
    pub fn new(
        title:  impl Into<String>,
        artist: impl Into<String>,
        genre:  impl Into<String>,
        year:   i32,
        views:  Option<u64>,
        lyrics: impl Into<String>,
    ) -> Self {
        Self {
            title:  title.into(),
            artist: artist.into(),
            genre:  genre.into(),
            year,
            views,
            lyrics: lyrics.into(),
        }
    }

    /// The (title, artist, year) identity used for de-duplication.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            title:  self.title.clone(),
            artist: self.artist.clone(),
            year:   self.year,
        }
    }

    /// Popularity used for ranking; a missing count ranks as 0.
    pub fn popularity(&self) -> u64 {
        self.views.unwrap_or(0)
    }
}

/// Identity of a song for duplicate detection.
///
/// Two different songs released by the same artist in the same
/// year under an identical title collapse onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title:  String,
    pub artist: String,
    pub year:   i32,
}

/// An ordered batch of records with its position in the source.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// Zero-based index of this chunk in the source file
    pub index:   usize,
    pub records: Vec<SongRecord>,
}

impl Chunk {
    pub fn new(index: usize, records: Vec<SongRecord>) -> Self {
        Self { index, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

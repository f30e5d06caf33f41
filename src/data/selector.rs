// ============================================================
// Layer 4 — Artist Selector
// ============================================================
// Picks the rows that make it into the training corpus for one
// (genre, artist) group:
//
//   1. genre equals the allow-list key, case-insensitively
//   2. artist field CONTAINS the allow-listed name,
//      case-insensitively ("Drake" also matches "Drake & Future")
//   3. at most `cap` rows, highest views first, ties in input order
//
// Step 2 is a substring test, so a short name can pull in rows of
// a different artist whose name contains it.

use crate::domain::song::SongRecord;

/// Case-insensitive substring match of an allow-listed artist name.
pub fn artist_matches(artist_field: &str, allowed: &str) -> bool {
    artist_field
        .to_lowercase()
        .contains(&allowed.to_lowercase())
}

pub fn genre_matches(genre_field: &str, genre: &str) -> bool {
    genre_field.trim().to_lowercase() == genre.trim().to_lowercase()
}

pub struct ArtistSelector {
    cap: usize,
}

impl ArtistSelector {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Rows for one (genre, artist) group, most viewed first.
    pub fn select<'a>(
        &self,
        rows:   &'a [SongRecord],
        genre:  &str,
        artist: &str,
    ) -> Vec<&'a SongRecord> {
        let mut group: Vec<&SongRecord> = rows
            .iter()
            .filter(|r| genre_matches(&r.genre, genre))
            .filter(|r| artist_matches(&r.artist, artist))
            .collect();

        // sort_by is stable, so equal view counts keep input order
        group.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
        group.truncate(self.cap);
        group
    }
}

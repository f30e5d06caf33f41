// ============================================================
// Layer 4 — Chunk Filters
// ============================================================
// Applies the cleaning predicates to one chunk at a time.
//
// Order matters and is fixed:
//   1. missing lyrics
//   2. placeholder artist (translation/romanization accounts)
//   3. romanized title
//   4. year outside (min_year, max_year), both exclusive
//   5. duplicate (title, artist, year) across the whole run
//   6. lyrics cleaning (see Preprocessor)
//   7. cleaned length outside [min_len, max_len]
//   8. sentinel "misc" genre
//
// The only state carried between chunks is the set of dedup keys
// already seen.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::PipelineError;
use crate::domain::song::{Chunk, DedupKey, SongRecord};

static ROMANIZED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bromani[sz]ed\b").expect("valid regex"));

// ─── Rules ────────────────────────────────────────────────────────────────────
/// Tunable thresholds for the cleaner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRules {
    /// Rows must have a year strictly greater than this
    pub min_year:            i32,
    /// Rows must have a year strictly less than this
    pub max_year:            i32,
    /// Minimum cleaned lyrics length in characters, inclusive
    pub min_len:             usize,
    /// Maximum cleaned lyrics length in characters, inclusive
    pub max_len:             usize,
    /// Artist names that are translation or romanization accounts
    pub placeholder_artists: Vec<String>,
    /// Genre value marking uncategorised songs
    pub misc_genre:          String,
}

impl Default for CleanRules {
    fn default() -> Self {
        Self {
            min_year:            1980,
            max_year:            2023,
            min_len:             100,
            max_len:             10_000,
            placeholder_artists: vec![
                "Genius English Translations".to_string(),
                "Genius Romanizations".to_string(),
                "Genius Traducciones al Español".to_string(),
                "Genius Brasil Traduções".to_string(),
                "Genius Türkçe Çeviri".to_string(),
                "Genius Translations".to_string(),
            ],
            misc_genre:          "misc".to_string(),
        }
    }
}

impl CleanRules {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.min_year >= self.max_year {
            return Err(PipelineError::InvalidConfig(format!(
                "min_year ({}) must be below max_year ({})",
                self.min_year, self.max_year
            )));
        }
        if self.min_len > self.max_len {
            return Err(PipelineError::InvalidConfig(format!(
                "min_len ({}) must not exceed max_len ({})",
                self.min_len, self.max_len
            )));
        }
        Ok(())
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        self.min_year < year && year < self.max_year
    }

    pub fn length_in_range(&self, lyrics: &str) -> bool {
        let len = lyrics.chars().count();
        self.min_len <= len && len <= self.max_len
    }

    pub fn is_placeholder_artist(&self, artist: &str) -> bool {
        let artist = artist.trim();
        self.placeholder_artists
            .iter()
            .any(|p| p.eq_ignore_ascii_case(artist))
    }

    pub fn is_misc_genre(&self, genre: &str) -> bool {
        genre.trim().eq_ignore_ascii_case(&self.misc_genre)
    }
}

pub fn is_romanized_title(title: &str) -> bool {
    ROMANIZED_TITLE.is_match(title)
}

// ─── Stats ────────────────────────────────────────────────────────────────────
/// Per-chunk accounting of where rows went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStats {
    pub chunk:               usize,
    pub rows_read:           usize,
    pub missing_lyrics:      usize,
    pub placeholder_artist:  usize,
    pub romanized:           usize,
    pub year_out_of_range:   usize,
    pub duplicate:           usize,
    pub length_out_of_range: usize,
    pub misc_genre:          usize,
    pub rows_kept:           usize,
}

impl ChunkStats {
    pub fn dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }

    /// Fold another chunk's counts into a running total.
    pub fn absorb(&mut self, other: &ChunkStats) {
        self.rows_read           += other.rows_read;
        self.missing_lyrics      += other.missing_lyrics;
        self.placeholder_artist  += other.placeholder_artist;
        self.romanized           += other.romanized;
        self.year_out_of_range   += other.year_out_of_range;
        self.duplicate           += other.duplicate;
        self.length_out_of_range += other.length_out_of_range;
        self.misc_genre          += other.misc_genre;
        self.rows_kept           += other.rows_kept;
    }
}

// ─── ChunkFilter ──────────────────────────────────────────────────────────────
/// Stateful filter applied chunk by chunk over one run.
pub struct ChunkFilter {
    rules:        CleanRules,
    preprocessor: Preprocessor,
    seen:         HashSet<DedupKey>,
}

impl ChunkFilter {
    pub fn new(rules: CleanRules) -> Self {
        Self {
            rules,
            preprocessor: Preprocessor::new(),
            seen:         HashSet::new(),
        }
    }

    /// Claim the dedup keys of a chunk an earlier run already
    /// processed, without cleaning or keeping any row. Only rows that
    /// would have reached the dedup check claim their key.
    pub fn replay(&mut self, chunk: &Chunk) {
        for song in &chunk.records {
            let screened = song.lyrics.trim().is_empty()
                || self.rules.is_placeholder_artist(&song.artist)
                || is_romanized_title(&song.title)
                || !self.rules.year_in_range(song.year);
            if !screened {
                self.seen.insert(song.dedup_key());
            }
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Filter one chunk, consuming it. Survivors keep input order
    /// and carry cleaned lyrics.
    pub fn apply(&mut self, chunk: Chunk) -> (Vec<SongRecord>, ChunkStats) {
        let mut stats = ChunkStats {
            chunk:     chunk.index,
            rows_read: chunk.len(),
            ..Default::default()
        };
        let mut kept = Vec::with_capacity(chunk.len());

        for mut song in chunk.records {
            if song.lyrics.trim().is_empty() {
                stats.missing_lyrics += 1;
                continue;
            }
            if self.rules.is_placeholder_artist(&song.artist) {
                stats.placeholder_artist += 1;
                continue;
            }
            if is_romanized_title(&song.title) {
                stats.romanized += 1;
                continue;
            }
            if !self.rules.year_in_range(song.year) {
                stats.year_out_of_range += 1;
                continue;
            }
            if !self.seen.insert(song.dedup_key()) {
                stats.duplicate += 1;
                continue;
            }

            song.lyrics = self.preprocessor.clean(&song.lyrics);

            if !self.rules.length_in_range(&song.lyrics) {
                stats.length_out_of_range += 1;
                continue;
            }
            if self.rules.is_misc_genre(&song.genre) {
                stats.misc_genre += 1;
                continue;
            }
            kept.push(song);
        }

        stats.rows_kept = kept.len();
        (kept, stats)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn lyrics(n: usize) -> String {
        "a".repeat(n)
    }

    fn song(title: &str, year: i32, text: &str) -> SongRecord {
        SongRecord::new(title, "Artist", "pop", year, Some(1), text)
    }

    fn run(rows: Vec<SongRecord>) -> (Vec<SongRecord>, ChunkStats) {
        ChunkFilter::new(CleanRules::default()).apply(Chunk::new(0, rows))
    }

    #[test]
    fn test_year_bounds_are_exclusive() {
        let (kept, stats) = run(vec![
            song("a", 1975, &lyrics(500)),
            song("b", 2000, &lyrics(500)),
            song("c", 1980, &lyrics(500)),
            song("d", 2023, &lyrics(500)),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].year, 2000);
        assert_eq!(stats.year_out_of_range, 3);
    }

    #[test]
    fn test_length_bounds() {
        let (kept, stats) = run(vec![
            song("short", 2000, &lyrics(5)),
            song("ok", 2000, &lyrics(500)),
            song("long", 2000, &lyrics(10_001)),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "ok");
        assert_eq!(stats.length_out_of_range, 2);
    }

    #[test]
    fn test_romanized_title_is_dropped() {
        let (kept, stats) = run(vec![song("Song (Romanized)", 2020, &lyrics(500))]);
        assert!(kept.is_empty());
        assert_eq!(stats.romanized, 1);
        assert!(is_romanized_title("Lemon (ROMANISED)"));
        assert!(!is_romanized_title("Romance"));
    }

    #[test]
    fn test_dedup_spans_chunks() {
        let mut filter = ChunkFilter::new(CleanRules::default());
        let (first, _)      = filter.apply(Chunk::new(0, vec![song("x", 2000, &lyrics(500))]));
        let (second, stats) = filter.apply(Chunk::new(1, vec![
            song("x", 2000, &lyrics(600)),
            song("x", 2001, &lyrics(600)),
        ]));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].year, 2001);
        assert_eq!(stats.duplicate, 1);
    }

    #[test]
    fn test_missing_placeholder_and_misc_are_dropped() {
        let mut misc        = song("m", 2000, &lyrics(500));
        misc.genre          = "Misc".into();
        let mut placeholder = song("p", 2000, &lyrics(500));
        placeholder.artist  = "genius romanizations".into();

        let (kept, stats) = run(vec![song("e", 2000, "   "), misc, placeholder]);
        assert!(kept.is_empty());
        assert_eq!(stats.missing_lyrics, 1);
        assert_eq!(stats.misc_genre, 1);
        assert_eq!(stats.placeholder_artist, 1);
        assert_eq!(stats.dropped(), 3);
    }

    #[test]
    fn test_lyrics_are_cleaned_before_length_check() {
        let text = format!("[Chorus]\n{}", lyrics(95));
        let (kept, _) = run(vec![song("t", 2000, &text)]);
        assert!(kept.is_empty(), "marker removal leaves 95 chars, under the bound");
    }

    #[test]
    fn test_reapplying_filters_drops_nothing() {
        let raw = vec![
            song("a", 1999, &format!("[Verse]\n{}\n\n\n\n{}", lyrics(80), lyrics(80))),
            song("b", 2005, &format!("\"{}\"", lyrics(300))),
            song("a", 1999, &lyrics(300)),
            song("c", 1970, &lyrics(300)),
        ];
        let (cleaned, _) = run(raw);
        let (again, stats) = run(cleaned.clone());

        assert_eq!(again, cleaned);
        assert_eq!(stats.dropped(), 0);
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        let rules = CleanRules { min_year: 2000, max_year: 2000, ..Default::default() };
        assert!(rules.validate().is_err());
        let rules = CleanRules { min_len: 10, max_len: 5, ..Default::default() };
        assert!(rules.validate().is_err());
        assert!(CleanRules::default().validate().is_ok());
    }

    #[test]
    fn test_replay_claims_keys_of_rows_that_reached_dedup() {
        let earlier = Chunk::new(0, vec![
            song("short", 2000, "too short"),
            song("old", 1970, &lyrics(300)),
        ]);
        let later = Chunk::new(1, vec![
            song("short", 2000, &lyrics(300)),
            song("old", 1970, &lyrics(300)),
        ]);

        let mut filter = ChunkFilter::new(CleanRules::default());
        filter.replay(&earlier);
        assert_eq!(filter.seen_count(), 1);

        let (kept, stats) = filter.apply(later);
        assert!(kept.is_empty());
        assert_eq!(stats.duplicate, 1);
        assert_eq!(stats.year_out_of_range, 1);
    }
}

// ============================================================
// Layer 3 — Corpus Entry (Tag Block Format)
// ============================================================
// One training example for the lyric model. Each of the four
// fields is wrapped in a paired start/end marker:
//
//   [s:genre]Pop[e:genre] [s:artist]Drake[e:artist] [s:year]2020[e:year] [s:lyrics] hello [e:lyrics]
//
// The format is bit-exact: the example preparer and the
// generation post-processor both parse it back, so format()
// and parse_all() must stay in lockstep.

use once_cell::sync::Lazy;
use regex::Regex;

pub const GENRE_START:  &str = "[s:genre]";
pub const GENRE_END:    &str = "[e:genre]";
pub const ARTIST_START: &str = "[s:artist]";
pub const ARTIST_END:   &str = "[e:artist]";
pub const YEAR_START:   &str = "[s:year]";
pub const YEAR_END:     &str = "[e:year]";
pub const LYRICS_START: &str = "[s:lyrics]";
pub const LYRICS_END:   &str = "[e:lyrics]";

/// Every marker the corpus uses, in the order they appear in a block.
pub const ALL_MARKERS: [&str; 8] = [
    GENRE_START, GENRE_END,
    ARTIST_START, ARTIST_END,
    YEAR_START, YEAR_END,
    LYRICS_START, LYRICS_END,
];

static BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\[s:genre\](.*?)\[e:genre\] \[s:artist\](.*?)\[e:artist\] \[s:year\](.*?)\[e:year\] \[s:lyrics\] (.*?) \[e:lyrics\]",
    )
    .expect("block pattern is a valid regex")
});

/// A song rendered as one delimited training block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub genre:  String,
    pub artist: String,
    pub year:   String,
    pub lyrics: String,
}

impl CorpusEntry {
    pub fn new(
        genre:  impl Into<String>,
        artist: impl Into<String>,
        year:   impl ToString,
        lyrics: impl Into<String>,
    ) -> Self {
        Self {
            genre:  genre.into(),
            artist: artist.into(),
            year:   year.to_string(),
            lyrics: lyrics.into(),
        }
    }

    /// Render the block, terminated by a newline.
    pub fn format(&self) -> String {
        format!(
            "{GENRE_START}{}{GENRE_END} {ARTIST_START}{}{ARTIST_END} {YEAR_START}{}{YEAR_END} {LYRICS_START} {} {LYRICS_END}\n",
            self.genre, self.artist, self.year, self.lyrics,
        )
    }

    /// Extract every well-formed block from a corpus text, in order.
    /// Text between blocks is ignored.
    pub fn parse_all(text: &str) -> Vec<CorpusEntry> {
        BLOCK_PATTERN
            .captures_iter(text)
            .map(|caps| CorpusEntry {
                genre:  caps[1].to_string(),
                artist: caps[2].to_string(),
                year:   caps[3].to_string(),
                lyrics: caps[4].to_string(),
            })
            .collect()
    }

    /// Parse exactly one block; None when the text holds no block.
    pub fn parse(text: &str) -> Option<CorpusEntry> {
        Self::parse_all(text).into_iter().next()
    }

    /// The block without its trailing newline, as fed to the tokenizer.
    pub fn training_text(&self) -> String {
        self.format().trim_end_matches('\n').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_is_bit_exact() {
        let e = CorpusEntry::new("Pop", "Drake", 2020, "hello");
        assert_eq!(
            e.format(),
            "[s:genre]Pop[e:genre] [s:artist]Drake[e:artist] [s:year]2020[e:year] [s:lyrics] hello [e:lyrics]\n"
        );
    }

    #[test]
    fn test_round_trip_recovers_fields() {
        let e      = CorpusEntry::new("Pop", "Drake", 2020, "hello");
        let parsed = CorpusEntry::parse(&e.format()).unwrap();
        assert_eq!(parsed.genre, "Pop");
        assert_eq!(parsed.artist, "Drake");
        assert_eq!(parsed.year, "2020");
        assert_eq!(parsed.lyrics, "hello");
    }

    #[test]
    fn test_parse_all_handles_multiline_lyrics() {
        let a = CorpusEntry::new("Rap", "Nas", 1994, "line one\nline two\n\nline three");
        let b = CorpusEntry::new("Rock", "U2", 1987, "with or without you");
        let corpus = format!("{}{}", a.format(), b.format());

        let parsed = CorpusEntry::parse_all(&corpus);
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn test_parse_ignores_garbage() {
        assert!(CorpusEntry::parse("no tags in here").is_none());
        assert!(CorpusEntry::parse("[s:genre]Pop[e:genre][s:lyrics]x[e:lyrics]").is_none());
    }
}

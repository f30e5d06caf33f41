// ============================================================
// Layer 4 — Lyrics Preprocessor
// ============================================================
// Cleans raw lyric text scraped from a lyrics site before it is
// length-checked and tagged.
//
// Scraped lyrics often contain:
//   - A "123 ContributorsTranslations…Lyrics" page header
//   - Section markers such as [Chorus] or [Verse 1: Artist]
//   - Emoji and other non-ASCII symbols
//   - Stray double quotes
//   - Runs of blank lines left behind by removed markers
//
// Cleaning steps (applied in order):
//   1. Remove the contributor header
//   2. Remove bracketed section markers (single line, first [ to first ])
//   3. Replace each run of non-ASCII characters with one space
//   4. Remove double quotes
//   5. Collapse 3+ consecutive newlines into exactly 2
//   6. Trim the whole text
//
// A later step can splice a new header or marker together, e.g.
// removing the quote in `1 Contributors"Translations Lyrics`. The
// steps are therefore repeated until the text stops changing, so
// cleaning already-clean text is a no-op. Every step that changes
// the text makes it shorter, which bounds the repetitions.

use once_cell::sync::Lazy;
use regex::Regex;

static CONTRIBUTOR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+ ContributorsTranslations.*?Lyrics").expect("valid regex"));
static SECTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]\n]*\]").expect("valid regex"));
static NON_ASCII: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x00-\x7F]+").expect("valid regex"));
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one lyrics string.
    ///
    /// Text holding a U+FFFD replacement character was not valid
    /// UTF-8 in the source table; it cleans to the empty string,
    /// which the length filter then drops.
    pub fn clean(&self, text: &str) -> String {
        if text.contains(char::REPLACEMENT_CHARACTER) {
            tracing::debug!("Dropping undecodable lyrics ({} bytes)", text.len());
            return String::new();
        }

        let mut text = text.to_string();
        loop {
            let next = Self::pass(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    fn pass(text: &str) -> String {
        let text = CONTRIBUTOR_HEADER.replace_all(text, "");
        let text = SECTION_MARKER.replace_all(&text, "");
        let text = NON_ASCII.replace_all(&text, " ");
        let text = text.replace('"', "");
        let text = BLANK_LINES.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_section_markers() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("[Intro]\nyeah\n[Verse 1: Drake]\nline"),
            "yeah\n\nline"
        );
    }

    #[test]
    fn test_removes_contributor_header() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("45 ContributorsTranslationsEspañolHotline Bling Lyrics\nYou used to"),
            "You used to"
        );
    }

    #[test]
    fn test_collapses_blank_lines() {
        let p = Preprocessor::new();
        let output = p.clean("line1\n\n[Chorus]\n\n\n\nline2");
        assert_eq!(output, "line1\n\nline2");
    }

    #[test]
    fn test_replaces_non_ascii_and_quotes() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("caf\u{e9}\u{e9} \"ole\""), "caf  ole");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let p = Preprocessor::new();
        let inputs = [
            "[a[b]c]\n\n\"\n\nend",
            "x\n\"\n\"\n\"\ny",
            "1 ContributorsTranslations Lyrics[Hook]\n\n\n\u{1F525}hook",
            "plain text",
            "1 Contributors\"Translations Lyrics\nhello",
            "1 Contributors[x]Translations Lyrics\nhello",
        ];
        for input in inputs {
            let once  = p.clean(input);
            let twice = p.clean(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_header_spliced_by_later_steps_is_removed() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("1 Contributors\"Translations Lyrics\nhello"), "hello");
        assert_eq!(p.clean("1 Contributors[x]Translations Lyrics\nhello"), "hello");
    }

    #[test]
    fn test_invalid_utf8_cleans_to_empty() {
        let p = Preprocessor::new();
        let lossy = String::from_utf8_lossy(&[0x66, 0xff, 0xfe]).into_owned();
        assert_eq!(p.clean(&lossy), "");
        assert_eq!(p.clean("ok"), "ok");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}

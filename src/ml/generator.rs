// ============================================================
// Layer 5 — Generation Prompt and Post-Processing
// ============================================================
// The language model itself lives behind the LyricsGenerator
// trait. This module owns the two text transforms around it:
//
//   build_prompt — conditioning prefix in corpus format:
//     [s:genre]Rap[e:genre] [s:artist]Nas[e:artist] [s:year]1994[e:year] [s:lyrics] <opening lines>
//
//   strip_tags — raw decode → display text:
//     1. cut everything after the first [e:lyrics]
//     2. drop the genre/artist/year fields, values included
//     3. drop any leftover marker (also the colon-less "[sgenre]"
//        variants the model sometimes emits)
//     4. drop <|endoftext|>
//     5. trim

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::corpus_entry::{
    ARTIST_END, ARTIST_START, GENRE_END, GENRE_START, LYRICS_END, LYRICS_START, YEAR_END,
    YEAR_START,
};

pub const END_OF_TEXT: &str = "<|endoftext|>";

static FIELD_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["genre", "artist", "year"]
        .iter()
        .map(|f| Regex::new(&format!(r"(?s)\[s:{f}\].*?\[e:{f}\]")).expect("valid regex"))
        .collect()
});
static STRAY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[se]:?(?:genre|artist|year|lyrics)\]").expect("valid regex")
});

/// What to condition a generation on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub genre:   String,
    pub artist:  Option<String>,
    pub year:    Option<i32>,
    /// Opening lines; empty lets the model start on its own
    pub opening: String,
}

pub fn build_prompt(spec: &PromptSpec) -> String {
    let mut prompt = format!("{GENRE_START}{}{GENRE_END}", spec.genre);
    if let Some(artist) = &spec.artist {
        prompt.push_str(&format!(" {ARTIST_START}{artist}{ARTIST_END}"));
    }
    if let Some(year) = spec.year {
        prompt.push_str(&format!(" {YEAR_START}{year}{YEAR_END}"));
    }
    prompt.push(' ');
    prompt.push_str(LYRICS_START);
    let opening = spec.opening.trim();
    if !opening.is_empty() {
        prompt.push(' ');
        prompt.push_str(opening);
    }
    prompt
}

pub fn strip_tags(generated: &str) -> String {
    let text = generated.split(LYRICS_END).next().unwrap_or_default();

    let mut text = text.to_string();
    for field in FIELD_BLOCKS.iter() {
        text = field.replace_all(&text, "").into_owned();
    }
    let text = STRAY_MARKER.replace_all(&text, "");
    text.replace(END_OF_TEXT, "").trim().to_string()
}

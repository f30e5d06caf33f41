// ============================================================
// Layer 3 — Artist Allow-List
// ============================================================
// Configuration data for the feature tagger:
//   genre_names — raw genre key ("rb") → display name ("R&B")
//   artists     — raw genre key → artist names to keep
//
// Both maps are keyed by genre and iterate alphabetically, not in
// file order, so the corpus is written in a stable order from run
// to run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowList {
    pub genre_names: BTreeMap<String, String>,
    pub artists:     BTreeMap<String, Vec<String>>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and small fixtures.
    pub fn with_genre(
        mut self,
        key:     impl Into<String>,
        display: impl Into<String>,
        artists: &[&str],
    ) -> Self {
        let key = key.into();
        self.genre_names.insert(key.clone(), display.into());
        self.artists
            .insert(key, artists.iter().map(|a| a.to_string()).collect());
        self
    }

    /// Display name for a genre key.
    pub fn display_name(&self, genre: &str) -> Result<&str, PipelineError> {
        self.genre_names
            .get(genre)
            .map(String::as_str)
            .ok_or_else(|| PipelineError::UnmappedGenre(genre.to_string()))
    }

    /// Every allow-listed genre must resolve to a display name.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for genre in self.artists.keys() {
            self.display_name(genre)?;
        }
        Ok(())
    }

    /// (genre key, display name, artists) in alphabetical key order;
/// artists keep their file order.
    pub fn groups(&self) -> Result<Vec<(&str, &str, &[String])>, PipelineError> {
        self.artists
            .iter()
            .map(|(genre, artists)| {
                let display = self.display_name(genre)?;
                Ok((genre.as_str(), display, artists.as_slice()))
            })
            .collect()
    }
}

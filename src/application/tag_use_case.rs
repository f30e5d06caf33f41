// ============================================================
// Layer 2 — TagUseCase
// ============================================================
// Builds the tagged training corpus from the cleaned table:
//
//   Step 1: Check every allow-listed genre has a display name
//   Step 2: Skip if either output already exists
//   Step 3: Load the whole cleaned table                (Layer 4)
//   Step 4: Per (genre, artist): top `cap` rows by views (Layer 4)
//   Step 5: Re-clean lyrics, drop empties, format blocks (Layer 3)
//   Step 6: Write features CSV and corpus text
//
// Genres are visited in alphabetical key order and each genre's
// artists in the order the allow-list file gives them, so the
// corpus layout is stable across runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::data::{
    loader::{CsvChunkReader, Schema},
    preprocessor::Preprocessor,
    selector::ArtistSelector,
};
use crate::domain::{
    allow_list::AllowList,
    corpus_entry::CorpusEntry,
    error::PipelineError,
};

// ─── Tag Configuration ────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    /// Cleaned table produced by `clean`
    pub input:        PathBuf,
    pub features_csv: PathBuf,
    pub corpus:       PathBuf,
    /// Max rows per (genre, artist) group
    pub cap:          usize,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            input:        PathBuf::from("data/processed/lyrics_processed.csv"),
            features_csv: PathBuf::from("data/processed/lyrics_features.csv"),
            corpus:       PathBuf::from("data/processed/lyrics_corpus.txt"),
            cap:          300,
        }
    }
}

/// One row of the features CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub title:          String,
    pub artist:         String,
    pub genre:          String,
    pub year:           i32,
    pub views:          u64,
    pub lyrics:         String,
    pub cleaned_lyrics: String,
    pub final_lyrics:   String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    Skipped,
    Completed {
        entries:        usize,
        /// Rows dropped because re-cleaning left no lyrics
        empty_dropped:  usize,
    },
}

// ─── TagUseCase ───────────────────────────────────────────────────────────────
pub struct TagUseCase {
    config:     TagConfig,
    allow_list: AllowList,
}

impl TagUseCase {
    pub fn new(config: TagConfig, allow_list: AllowList) -> Self {
        Self { config, allow_list }
    }

    pub fn execute(&self) -> Result<TagOutcome> {
        let cfg = &self.config;

        // ── Step 1: Resolve genres up front ───────────────────────────────────
        let groups = self.allow_list.groups()?;
        if cfg.cap == 0 {
            return Err(PipelineError::InvalidConfig("cap must be at least 1".into()).into());
        }

        // ── Step 2: Skip guard ────────────────────────────────────────────────
        for out in [&cfg.features_csv, &cfg.corpus] {
            if out.exists() {
                tracing::warn!("Output '{}' already exists; treating tag as completed", out.display());
                return Ok(TagOutcome::Skipped);
            }
        }
        if !cfg.input.is_file() {
            tracing::error!("Cleaned table '{}' not found; aborting tag", cfg.input.display());
            return Err(PipelineError::SourceNotFound(cfg.input.clone()).into());
        }

        // ── Step 3: Load ──────────────────────────────────────────────────────
        let rows = CsvChunkReader::open(&cfg.input, Schema::CLEANED, 100_000)?.read_all()?;
        tracing::info!("Loaded {} cleaned rows from '{}'", rows.len(), cfg.input.display());

        // ── Steps 4-5: Select and format ──────────────────────────────────────
        let selector = ArtistSelector::new(cfg.cap);
        let prep     = Preprocessor::new();

        let mut features      = Vec::new();
        let mut empty_dropped = 0usize;

        for (genre, genre_name, artists) in groups {
            let before = features.len();
            for artist in artists {
                for row in selector.select(&rows, genre, artist) {
                    let cleaned = prep.clean(&row.lyrics);
                    if cleaned.is_empty() {
                        empty_dropped += 1;
                        continue;
                    }
                    let entry = CorpusEntry::new(genre_name, artist.as_str(), row.year, cleaned.as_str());
                    features.push(FeatureRow {
                        title:          row.title.clone(),
                        artist:         row.artist.clone(),
                        genre:          row.genre.clone(),
                        year:           row.year,
                        views:          row.popularity(),
                        lyrics:         row.lyrics.clone(),
                        cleaned_lyrics: cleaned,
                        final_lyrics:   entry.format(),
                    });
                }
            }
            tracing::info!("Genre '{}': {} songs selected", genre_name, features.len() - before);
        }

        // ── Step 6: Write ─────────────────────────────────────────────────────
        write_features(&cfg.features_csv, &features)?;
        write_corpus(&cfg.corpus, &features)?;

        tracing::info!(
            "Wrote {} corpus blocks to '{}' ({} empty after cleaning)",
            features.len(),
            cfg.corpus.display(),
            empty_dropped
        );

        Ok(TagOutcome::Completed { entries: features.len(), empty_dropped })
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_features(path: &Path, rows: &[FeatureRow]) -> Result<()> {
    create_parent(path)?;
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create features CSV '{}'", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_corpus(path: &Path, rows: &[FeatureRow]) -> Result<()> {
    create_parent(path)?;
    let text: String = rows.iter().map(|r| r.final_lyrics.as_str()).collect();
    fs::write(path, text)
        .with_context(|| format!("Cannot write corpus '{}'", path.display()))?;
    Ok(())
}

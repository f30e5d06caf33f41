// ============================================================
// Layer 6 — Chunk Metrics Logger
// ============================================================
// Records per-chunk cleaning statistics to a CSV file.
//
// Metrics recorded per chunk:
//   - chunk:     zero-based chunk index
//   - rows_read: rows parsed from the source
//   - one column per filter with the rows it dropped
//   - rows_kept: rows appended to the cleaned table
//
// Example CSV output:
//   chunk,rows_read,missing_lyrics,placeholder_artist,romanized,year_out_of_range,duplicate,length_out_of_range,misc_genre,rows_kept
//   0,100000,12,830,211,40122,905,3310,1022,53588
//
// The header is written once; later runs append below it.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::data::filters::ChunkStats;

const HEADER: [&str; 10] = [
    "chunk",
    "rows_read",
    "missing_lyrics",
    "placeholder_artist",
    "romanized",
    "year_out_of_range",
    "duplicate",
    "length_out_of_range",
    "misc_genre",
    "rows_kept",
];

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, writing the header if the file is new.
    pub fn new(csv_path: impl AsRef<Path>) -> Result<Self> {
        let csv_path = csv_path.as_ref().to_path_buf();

        if let Some(dir) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        if !csv_path.exists() {
            let mut w = WriterBuilder::new()
                .has_headers(false)
                .from_path(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            w.write_record(HEADER)?;
            w.flush()?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one chunk's statistics.
    pub fn log(&self, stats: &ChunkStats) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut w = WriterBuilder::new().has_headers(false).from_writer(file);
        w.serialize(stats)?;
        w.flush()?;
        Ok(())
    }
}

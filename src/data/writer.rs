// ============================================================
// Layer 4 — Append-Mode Table Writer
// ============================================================
// Appends cleaned rows to a CSV file, chunk by chunk.
//
// The header row is written only when the file is created. Each
// append is flushed before returning, so a crash between chunks
// leaves every earlier chunk fully on disk. There is exactly one
// writer per output file.
//
// Reference: csv crate documentation (Writer, WriterBuilder)

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use crate::domain::song::SongRecord;

/// Column names of the cleaned table, in order.
pub const CLEANED_HEADER: [&str; 6] = ["song", "artist", "genre", "year", "views", "lyrics"];

pub struct AppendWriter {
    path:         PathBuf,
    writer:       Writer<File>,
    rows_written: u64,
}

impl AppendWriter {
    /// Open `path` for appending, creating it (with a header) if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path  = path.as_ref().to_path_buf();
        let fresh = !path.exists();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Cannot open '{}' for appending", path.display()))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if fresh {
            writer.write_record(CLEANED_HEADER)?;
            writer.flush()?;
            tracing::debug!("Created '{}' with header", path.display());
        }

        Ok(Self { path, writer, rows_written: 0 })
    }

    /// Append a batch of rows and flush them to disk.
    pub fn append(&mut self, rows: &[SongRecord]) -> Result<()> {
        for row in rows {
            let year  = row.year.to_string();
            let views = row.views.map(|v| v.to_string()).unwrap_or_default();
            self.writer
                .write_record([
                    row.title.as_str(),
                    row.artist.as_str(),
                    row.genre.as_str(),
                    year.as_str(),
                    views.as_str(),
                    row.lyrics.as_str(),
                ])
                .with_context(|| format!("Cannot append to '{}'", self.path.display()))?;
        }
        self.writer
            .flush()
            .with_context(|| format!("Cannot flush '{}'", self.path.display()))?;

        self.rows_written += rows.len() as u64;
        Ok(())
    }

    /// Rows appended through this writer (not counting earlier runs).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Current size of the output file in bytes.
    pub fn byte_len(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once_across_opens() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/clean.csv");
        let row  = SongRecord::new("A", "B", "pop", 2000, Some(3), "line one\nline two");

        let mut w = AppendWriter::open(&path).unwrap();
        w.append(std::slice::from_ref(&row)).unwrap();
        drop(w);
        let mut w = AppendWriter::open(&path).unwrap();
        w.append(&[row]).unwrap();
        assert_eq!(w.rows_written(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("song,artist,genre,year,views,lyrics").count(), 1);
        assert_eq!(text.matches("\"line one\nline two\"").count(), 2);
        assert_eq!(w.byte_len().unwrap(), text.len() as u64);
    }

    #[test]
    fn test_missing_views_written_empty() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");
        let mut w = AppendWriter::open(&path).unwrap();
        w.append(&[SongRecord::new("A", "B", "pop", 2000, None, "x")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("A,B,pop,2000,,x\n"));
    }
}

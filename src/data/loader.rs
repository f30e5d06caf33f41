// ============================================================
// Layer 4 — Chunked Lyrics Loader
// ============================================================
// Streams a delimited lyrics table from disk in fixed-size
// batches of SongRecords.
//
// How a table maps onto a SongRecord:
//   The header row is resolved against a Schema, which lists the
//   accepted names for each field. The raw scrape calls the genre
//   column "tag" and the title column "title"; the cleaned table
//   written by this crate calls them "genre" and "song". Missing
//   required columns are reported all at once, before any data row
//   is read.
//
// Rows are read as raw bytes and decoded lossily, so one bad
// cell never aborts a chunk. Undecodable lyrics keep their U+FFFD
// markers and are dropped later by the cleaner.
//
// Reference: csv crate documentation (ByteRecord, flexible readers)

use anyhow::{Context, Result};
use csv::{ByteRecord, Reader, ReaderBuilder, StringRecord};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::domain::error::PipelineError;
use crate::domain::song::{Chunk, SongRecord};
use crate::domain::traits::ChunkSource;

// ─── Schema ───────────────────────────────────────────────────────────────────
/// Accepted header names per field.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub title:          &'static [&'static str],
    pub artist:         &'static [&'static str],
    pub genre:          &'static [&'static str],
    pub year:           &'static [&'static str],
    pub views:          &'static [&'static str],
    pub lyrics:         &'static [&'static str],
    pub views_required: bool,
}

impl Schema {
    /// The scraped source table: `title, artist, tag, year, views, lyrics`.
    pub const RAW: Schema = Schema {
        title:          &["title"],
        artist:         &["artist"],
        genre:          &["tag"],
        year:           &["year"],
        views:          &["views"],
        lyrics:         &["lyrics"],
        views_required: true,
    };

    /// A cleaned table, as written by the cleaner or an older export.
    pub const CLEANED: Schema = Schema {
        title:          &["song", "title"],
        artist:         &["artist"],
        genre:          &["genre", "tag"],
        year:           &["year"],
        views:          &["views"],
        lyrics:         &["lyrics"],
        views_required: false,
    };

    fn resolve(&self, headers: &StringRecord, path: &Path) -> Result<ColumnIndex, PipelineError> {
        let mut missing = Vec::new();
        let mut find = |aliases: &[&str], required: bool| -> Option<usize> {
            let found = headers.iter().position(|h| {
                aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a))
            });
            if found.is_none() && required {
                missing.push(aliases.join("|"));
            }
            found
        };

        let title  = find(self.title, true);
        let artist = find(self.artist, true);
        let genre  = find(self.genre, true);
        let year   = find(self.year, true);
        let views  = find(self.views, self.views_required);
        let lyrics = find(self.lyrics, true);

        match (title, artist, genre, year, lyrics) {
            (Some(title), Some(artist), Some(genre), Some(year), Some(lyrics))
                if missing.is_empty() =>
            {
                Ok(ColumnIndex { title, artist, genre, year, views, lyrics })
            }
            _ => Err(PipelineError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            }),
        }
    }
}

/// Resolved column positions for one file.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    title:  usize,
    artist: usize,
    genre:  usize,
    year:   usize,
    views:  Option<usize>,
    lyrics: usize,
}

impl ColumnIndex {
    fn parse(&self, row: &ByteRecord) -> SongRecord {
        let year_text = text(row, self.year);
        let year = parse_year(&year_text).unwrap_or_else(|| {
            tracing::trace!("Unparsable year '{}'", year_text);
            0
        });

        SongRecord {
            title:  text(row, self.title),
            artist: text(row, self.artist),
            genre:  text(row, self.genre),
            year,
            views:  self.views.and_then(|i| parse_count(&text(row, i))),
            lyrics: text(row, self.lyrics),
        }
    }
}

// ─── CsvChunkReader ───────────────────────────────────────────────────────────
/// Reads a lyrics table `chunk_size` rows at a time.
pub struct CsvChunkReader {
    path:       PathBuf,
    reader:     Reader<File>,
    columns:    ColumnIndex,
    chunk_size: usize,
    next_index: usize,
    row:        ByteRecord,
    exhausted:  bool,
}

impl CsvChunkReader {
    /// Open `path` and resolve its header against `schema`.
    ///
    /// Fails with `SourceNotFound` when the file is absent and with
    /// `MissingColumns` when the header lacks a required field.
    pub fn open(path: impl AsRef<Path>, schema: Schema, chunk_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(PipelineError::SourceNotFound(path).into());
        }
        if chunk_size == 0 {
            return Err(PipelineError::InvalidConfig("chunk_size must be at least 1".into()).into());
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", path.display()))?
            .clone();
        let columns = schema.resolve(&headers, &path)?;

        tracing::debug!("Opened '{}' with columns {:?}", path.display(), columns);

        Ok(Self {
            path,
            reader,
            columns,
            chunk_size,
            next_index: 0,
            row: ByteRecord::new(),
            exhausted: false,
        })
    }

    /// Read every remaining row into memory.
    pub fn read_all(mut self) -> Result<Vec<SongRecord>> {
        let mut records = Vec::new();
        while let Some(chunk) = self.next_chunk()? {
            records.extend(chunk.records);
        }
        Ok(records)
    }
}

impl ChunkSource for CsvChunkReader {
    fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut records = Vec::with_capacity(self.chunk_size.min(8192));
        while records.len() < self.chunk_size {
            let more = self
                .reader
                .read_byte_record(&mut self.row)
                .with_context(|| format!("Malformed row in '{}'", self.path.display()))?;
            if !more {
                self.exhausted = true;
                break;
            }
            records.push(self.columns.parse(&self.row));
        }

        if records.is_empty() {
            return Ok(None);
        }

        let chunk = Chunk::new(self.next_index, records);
        self.next_index += 1;
        Ok(Some(chunk))
    }
}

fn text(row: &ByteRecord, index: usize) -> String {
    row.get(index)
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

/// Parse a year cell; spreadsheet exports sometimes write "2020.0".
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    s.parse::<i32>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i32::MAX as f64)
            .map(|f| f as i32)
    })
}

fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    s.parse::<u64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

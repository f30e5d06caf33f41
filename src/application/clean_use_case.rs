// ============================================================
// Layer 2 — CleanUseCase
// ============================================================
// Orchestrates the chunked cleaner:
//
//   Step 1: Validate rules, check the source exists   (Layer 4)
//   Step 2: Skip if the output exists, or pick up a
//           resumable manifest with --resume          (Layer 6)
//   Step 3: Open the source, resolve its columns      (Layer 4)
//   Step 4: For each chunk: filter, append, flush,
//           update manifest, log stats                (Layers 4, 6)
//           Chunks already written by a resumed run are
//           only replayed into the dedup set.
//   Step 5: Mark the manifest completed               (Layer 6)
//
// Without --resume an existing output always means "already
// done". Re-running after deleting only the manifest, or after
// appending to the output by hand, duplicates rows silently; the
// skip guard cannot tell.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use crate::data::{
    filters::{ChunkFilter, ChunkStats, CleanRules},
    loader::{CsvChunkReader, Schema},
    writer::AppendWriter,
};
use crate::domain::error::PipelineError;
use crate::domain::traits::ChunkSource;
use crate::infra::{
    checkpoint::{CheckpointManager, RunManifest},
    metrics::MetricsLogger,
};

// ─── Clean Configuration ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    pub source:     PathBuf,
    pub output:     PathBuf,
    /// Rows per chunk; memory use is bounded by this
    pub chunk_size: usize,
    pub rules:      CleanRules,
    /// Optional per-chunk statistics CSV
    pub stats_path: Option<PathBuf>,
    /// Continue an interrupted run from its manifest
    pub resume:     bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            source:     PathBuf::from("data/raw/song_lyrics.csv"),
            output:     PathBuf::from("data/processed/lyrics_processed.csv"),
            chunk_size: 100_000,
            rules:      CleanRules::default(),
            stats_path: None,
            resume:     false,
        }
    }
}

/// What a clean run did.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutcome {
    /// Output already existed; nothing was read or written
    Skipped,
    Completed {
        chunks:       usize,
        totals:       ChunkStats,
        /// First chunk processed when the run was resumed
        resumed_from: Option<usize>,
    },
}

// ─── CleanUseCase ─────────────────────────────────────────────────────────────
pub struct CleanUseCase {
    config: CleanConfig,
}

impl CleanUseCase {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<CleanOutcome> {
        let cfg = &self.config;

        // ── Step 1: Validate before touching the filesystem ───────────────────
        cfg.rules.validate()?;
        if cfg.chunk_size == 0 {
            return Err(PipelineError::InvalidConfig("chunk_size must be at least 1".into()).into());
        }
        if !cfg.source.is_file() {
            tracing::error!("Source file '{}' not found; aborting clean", cfg.source.display());
            return Err(PipelineError::SourceNotFound(cfg.source.clone()).into());
        }

        // ── Step 2: Skip guard / resume point ─────────────────────────────────
        let ckpt   = CheckpointManager::for_output(&cfg.output);
        let resume = if cfg.output.exists() {
            match self.resumable_manifest(&ckpt)? {
                Some(manifest) => Some(manifest),
                None => {
                    tracing::warn!(
                        "Output '{}' already exists; treating clean as completed",
                        cfg.output.display()
                    );
                    return Ok(CleanOutcome::Skipped);
                }
            }
        } else {
            None
        };

        // ── Step 3: Open source (fails fast on missing columns) ───────────────
        let mut reader = CsvChunkReader::open(&cfg.source, Schema::RAW, cfg.chunk_size)?;
        let mut filter = ChunkFilter::new(cfg.rules.clone());

        let resumed_from = resume.as_ref().map(RunManifest::next_chunk);
        let mut manifest = match resume {
            Some(manifest) => {
                self.rewind_output(&manifest)?;
                manifest
            }
            None => RunManifest::start(&cfg.source, cfg.chunk_size, 0),
        };

        let mut writer = AppendWriter::open(&cfg.output)?;
        manifest.output_len = writer.byte_len()?;
        ckpt.save(&manifest)?;

        let metrics = match &cfg.stats_path {
            Some(path) => Some(MetricsLogger::new(path)?),
            None => None,
        };

        tracing::info!(
            "Cleaning '{}' → '{}' in chunks of {} rows",
            cfg.source.display(),
            cfg.output.display(),
            cfg.chunk_size
        );

        // ── Step 4: Chunk loop ────────────────────────────────────────────────
        let skip_until = manifest.next_chunk();
        let mut totals = ChunkStats::default();
        let mut chunks = 0usize;

        while let Some(chunk) = reader.next_chunk()? {
            if chunk.index < skip_until {
                filter.replay(&chunk);
                continue;
            }

            let (kept, stats) = filter.apply(chunk);
            writer.append(&kept)?;

            manifest.last_chunk    = Some(stats.chunk);
            manifest.rows_written += kept.len() as u64;
            manifest.output_len    = writer.byte_len()?;
            ckpt.save(&manifest)?;

            if let Some(m) = &metrics {
                m.log(&stats)?;
            }
            tracing::info!(
                "Chunk {}: read {}, kept {}, dropped {}",
                stats.chunk,
                stats.rows_read,
                stats.rows_kept,
                stats.dropped()
            );

            totals.absorb(&stats);
            chunks += 1;
        }

        // ── Step 5: Done ──────────────────────────────────────────────────────
        manifest.completed = true;
        ckpt.save(&manifest)?;

        tracing::info!(
            "Clean finished: {} chunks, {} rows read, {} rows written",
            chunks,
            totals.rows_read,
            totals.rows_kept
        );

        Ok(CleanOutcome::Completed { chunks, totals, resumed_from })
    }

    /// The manifest to resume from, if `--resume` is on, the manifest
    /// describes an unfinished run of the same source, and the output
    /// still holds every byte the manifest recorded.
    fn resumable_manifest(&self, ckpt: &CheckpointManager) -> Result<Option<RunManifest>> {
        let cfg = &self.config;
        if !cfg.resume {
            return Ok(None);
        }

        let manifest = match ckpt.load()? {
            Some(m) => m,
            None => {
                tracing::warn!("No manifest at '{}'; cannot resume", ckpt.path().display());
                return Ok(None);
            }
        };

        if manifest.source != cfg.source || !manifest.can_resume_with(cfg.chunk_size) {
            tracing::warn!(
                "Manifest '{}' does not describe an unfinished run of '{}' with chunk size {}",
                ckpt.path().display(),
                cfg.source.display(),
                cfg.chunk_size
            );
            return Ok(None);
        }

        let on_disk = fs::metadata(&cfg.output)
            .with_context(|| format!("Cannot stat '{}'", cfg.output.display()))?
            .len();
        if on_disk < manifest.output_len {
            tracing::warn!(
                "Output '{}' is {} bytes, shorter than the {} bytes recorded in '{}'; cannot resume",
                cfg.output.display(),
                on_disk,
                manifest.output_len,
                ckpt.path().display()
            );
            return Ok(None);
        }

        tracing::info!("Resuming clean from chunk {}", manifest.next_chunk());
        Ok(Some(manifest))
    }

    /// Cut off anything written after the last recorded chunk.
    fn rewind_output(&self, manifest: &RunManifest) -> Result<()> {
        let output = &self.config.output;

        OpenOptions::new()
            .write(true)
            .open(output)
            .and_then(|f| f.set_len(manifest.output_len))
            .with_context(|| format!("Cannot truncate '{}'", output.display()))?;

        tracing::debug!("Rewound '{}' to {} bytes", output.display(), manifest.output_len);
        Ok(())
    }
}

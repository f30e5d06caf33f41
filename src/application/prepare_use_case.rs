// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Turns the tagged corpus into tokenised examples for the
// external fine-tuning loop:
//
//   Step 1: Validate config                           (no I/O)
//   Step 2: Parse tag blocks from the corpus          (Layer 3)
//   Step 3: Load tokenizer, register tag markers      (Layer 6)
//   Step 4: Encode each block to block_size           (Layer 5)
//   Step 5: Shuffle + split train/eval                (Layer 4)
//   Step 6: Write train.jsonl, eval.jsonl and the run
//           config next to them                       (Layers 4, 6)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::data::{dataset::LyricsDataset, splitter::split_train_val};
use crate::domain::{corpus_entry::CorpusEntry, error::PipelineError};
use crate::infra::{config_store::save_config, tokenizer_store::ModelArtifacts};
use crate::ml::{encoder::ExampleEncoder, generator::END_OF_TEXT};

// ─── Prepare Configuration ────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub corpus:         PathBuf,
    /// Holds tokenizer/tokenizer.json and model/
    pub artifacts_dir:  PathBuf,
    pub out_dir:        PathBuf,
    pub block_size:     usize,
    pub pad_token:      String,
    pub train_fraction: f64,
    /// Fixed shuffle seed; random when absent
    pub seed:           Option<u64>,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            corpus:         PathBuf::from("data/processed/lyrics_corpus.txt"),
            artifacts_dir:  PathBuf::from("models/gpt2"),
            out_dir:        PathBuf::from("data/prepared"),
            block_size:     128,
            pad_token:      END_OF_TEXT.to_string(),
            train_fraction: 0.9,
            seed:           None,
        }
    }
}

impl PrepareConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.block_size == 0 {
            return Err(PipelineError::InvalidConfig("block_size must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.train_fraction) {
            return Err(PipelineError::InvalidConfig(format!(
                "train_fraction must be in [0, 1], got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct PreparedSplits {
    pub train: LyricsDataset,
    pub eval:  LyricsDataset,
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PreparedSplits> {
        let cfg = &self.config;

        // ── Step 1 ────────────────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Corpus blocks ─────────────────────────────────────────────
        if !cfg.corpus.is_file() {
            tracing::error!("Corpus '{}' not found", cfg.corpus.display());
            return Err(PipelineError::SourceNotFound(cfg.corpus.clone()).into());
        }
        let text = fs::read_to_string(&cfg.corpus)
            .with_context(|| format!("Cannot read corpus '{}'", cfg.corpus.display()))?;
        let entries = CorpusEntry::parse_all(&text);
        if entries.is_empty() {
            return Err(PipelineError::EmptyCorpus(cfg.corpus.clone()).into());
        }
        tracing::info!("Parsed {} tag blocks from '{}'", entries.len(), cfg.corpus.display());

        // ── Step 3: Tokenizer ─────────────────────────────────────────────────
        let artifacts = ModelArtifacts::new(&cfg.artifacts_dir);
        let tokenizer = artifacts.load_tokenizer()?;

        // ── Step 4: Encode ────────────────────────────────────────────────────
        let encoder = ExampleEncoder::new(&tokenizer, cfg.block_size, &cfg.pad_token)?;
        let examples = entries
            .iter()
            .map(|e| encoder.encode(&e.training_text()))
            .collect::<Result<Vec<_>>>()?;

        let truncated = examples.iter().filter(|e| e.real_tokens() == cfg.block_size).count();
        tracing::debug!("{} of {} blocks fill the whole window", truncated, examples.len());

        // ── Step 5: Split ─────────────────────────────────────────────────────
        let (train, eval) = split_train_val(examples, cfg.train_fraction, cfg.seed);
        let train = LyricsDataset::new(train);
        let eval  = LyricsDataset::new(eval);

        // ── Step 6: Write ─────────────────────────────────────────────────────
        fs::create_dir_all(&cfg.out_dir)
            .with_context(|| format!("Cannot create '{}'", cfg.out_dir.display()))?;
        train.save_jsonl(cfg.out_dir.join("train.jsonl"))?;
        eval.save_jsonl(cfg.out_dir.join("eval.jsonl"))?;
        save_config(cfg, cfg.out_dir.join("prepare_config.json"))?;

        tracing::info!(
            "Prepared {} train / {} eval examples in '{}'",
            train.example_count(),
            eval.example_count(),
            cfg.out_dir.display()
        );

        Ok(PreparedSplits { train, eval })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::write_test_tokenizer;
    use burn::data::dataset::Dataset;
    use std::path::Path;

    fn setup(dir: &Path, blocks: usize) -> PrepareConfig {
        write_test_tokenizer(&dir.join("artifacts"), &["Pop", "Adele", "2015", "hello", "again"]);

        let corpus: String = (0..blocks)
            .map(|_| CorpusEntry::new("Pop", "Adele", 2015, "hello again").format())
            .collect();
        fs::write(dir.join("corpus.txt"), corpus).unwrap();

        PrepareConfig {
            corpus:         dir.join("corpus.txt"),
            artifacts_dir:  dir.join("artifacts"),
            out_dir:        dir.join("prepared"),
            block_size:     16,
            seed:           Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_splits_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = setup(dir.path(), 10);

        let splits = PrepareUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(splits.train.len(), 9);
        assert_eq!(splits.eval.len(), 1);

        let example = splits.train.get(0).unwrap();
        assert_eq!(example.input_ids.len(), 16);
        assert_eq!(example.attention_mask.len(), 16);
        assert_eq!(example.labels, example.input_ids);

        let reloaded = LyricsDataset::load_jsonl(cfg.out_dir.join("train.jsonl")).unwrap();
        assert_eq!(reloaded.example_count(), 9);
        assert!(cfg.out_dir.join("eval.jsonl").is_file());

        let saved: PrepareConfig = serde_json::from_str(
            &fs::read_to_string(cfg.out_dir.join("prepare_config.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved.block_size, 16);
        assert_eq!(saved.pad_token, "<|endoftext|>");
    }

    #[test]
    fn test_markers_encode_as_single_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PrepareConfig { train_fraction: 1.0, ..setup(dir.path(), 1) };

        let splits = PrepareUseCase::new(cfg).execute().unwrap();
        let tok    = ModelArtifacts::new(dir.path().join("artifacts")).load_tokenizer().unwrap();
        let ids    = &splits.train.get(0).unwrap().input_ids;

        assert_eq!(ids[0], tok.token_to_id("[s:genre]").unwrap());
        assert_eq!(ids[1], tok.token_to_id("Pop").unwrap());
        assert_eq!(ids[2], tok.token_to_id("[e:genre]").unwrap());
    }

    #[test]
    fn test_corpus_without_blocks_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = setup(dir.path(), 0);
        fs::write(&cfg.corpus, "just some text\n").unwrap();

        let err = PrepareUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::EmptyCorpus(_))
        ));
        assert!(!cfg.out_dir.exists());
    }

    #[test]
    fn test_invalid_config_fails_before_io() {
        let cfg = PrepareConfig { train_fraction: 1.5, ..Default::default() };
        let err = PrepareUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_tokenizer_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = setup(dir.path(), 2);
        fs::remove_dir_all(&cfg.artifacts_dir).unwrap();

        let err = PrepareUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingArtifact(_))
        ));
    }
}

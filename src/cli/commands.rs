// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand per pipeline stage plus `strip` for cleaning up
// generated text:
//
//   clean   → CleanConfig
//   tag     → TagConfig (+ allow-list path)
//   prepare → PrepareConfig
//   strip   → reads a file or stdin
//
// Defaults mirror each config's Default impl.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    clean_use_case::CleanConfig,
    prepare_use_case::PrepareConfig,
    tag_use_case::TagConfig,
};
use crate::data::filters::CleanRules;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean the raw lyrics table chunk by chunk
    Clean(CleanArgs),

    /// Select allow-listed artists and write the tagged corpus
    Tag(TagArgs),

    /// Tokenise the corpus into train/eval examples
    Prepare(PrepareArgs),

    /// Remove control tags from generated text
    Strip(StripArgs),
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Raw lyrics CSV (title, artist, tag, year, views, lyrics)
    #[arg(long, default_value = "data/raw/song_lyrics.csv")]
    pub source: PathBuf,

    /// Cleaned CSV; the run is skipped if it already exists
    #[arg(long, default_value = "data/processed/lyrics_processed.csv")]
    pub output: PathBuf,

    /// Rows read and written per chunk
    #[arg(long, default_value_t = 100_000)]
    pub chunk_size: usize,

    /// Keep songs released strictly after this year
    #[arg(long, default_value_t = 1980)]
    pub min_year: i32,

    /// Keep songs released strictly before this year
    #[arg(long, default_value_t = 2023)]
    pub max_year: i32,

    /// Minimum cleaned lyrics length in characters
    #[arg(long, default_value_t = 100)]
    pub min_len: usize,

    /// Maximum cleaned lyrics length in characters
    #[arg(long, default_value_t = 10_000)]
    pub max_len: usize,

    /// Append per-chunk filter statistics to this CSV
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Continue an interrupted run from its manifest
    #[arg(long)]
    pub resume: bool,
}

impl From<CleanArgs> for CleanConfig {
    fn from(a: CleanArgs) -> Self {
        CleanConfig {
            source:     a.source,
            output:     a.output,
            chunk_size: a.chunk_size,
            rules:      CleanRules {
                min_year: a.min_year,
                max_year: a.max_year,
                min_len:  a.min_len,
                max_len:  a.max_len,
                ..CleanRules::default()
            },
            stats_path: a.stats,
            resume:     a.resume,
        }
    }
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Cleaned CSV written by `clean`
    #[arg(long, default_value = "data/processed/lyrics_processed.csv")]
    pub input: PathBuf,

    /// Features CSV with cleaned and tagged lyrics
    #[arg(long, default_value = "data/processed/lyrics_features.csv")]
    pub features_csv: PathBuf,

    /// Tagged corpus text, one block per line group
    #[arg(long, default_value = "data/processed/lyrics_corpus.txt")]
    pub corpus: PathBuf,

    /// Genre display names and per-genre artist allow-list
    #[arg(long, default_value = "config/allow_list.json")]
    pub allow_list: PathBuf,

    /// Most-viewed songs kept per artist
    #[arg(long, default_value_t = 300)]
    pub cap: usize,
}

impl From<TagArgs> for TagConfig {
    fn from(a: TagArgs) -> Self {
        TagConfig {
            input:        a.input,
            features_csv: a.features_csv,
            corpus:       a.corpus,
            cap:          a.cap,
        }
    }
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Tagged corpus written by `tag`
    #[arg(long, default_value = "data/processed/lyrics_corpus.txt")]
    pub corpus: PathBuf,

    /// Model artifacts directory (tokenizer/tokenizer.json, model/)
    #[arg(long, default_value = "models/gpt2")]
    pub artifacts_dir: PathBuf,

    /// Where train.jsonl, eval.jsonl and prepare_config.json go
    #[arg(long, default_value = "data/prepared")]
    pub out_dir: PathBuf,

    /// Tokens per example after truncation/padding
    #[arg(long, default_value_t = 128)]
    pub block_size: usize,

    /// Token used for padding; must exist in the vocabulary
    #[arg(long, default_value = "<|endoftext|>")]
    pub pad_token: String,

    /// Share of examples used for training
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Shuffle seed for a reproducible split
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            corpus:         a.corpus,
            artifacts_dir:  a.artifacts_dir,
            out_dir:        a.out_dir,
            block_size:     a.block_size,
            pad_token:      a.pad_token,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct StripArgs {
    /// File with raw generated text; stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_clean_args_map_onto_rules() {
        let cli = Cli::try_parse_from([
            "lyrics-pipeline", "clean", "--source", "raw.csv", "--min-year", "1990", "--resume",
        ])
        .unwrap();
        let Commands::Clean(args) = cli.command else { panic!("expected clean") };

        let cfg: CleanConfig = args.into();
        assert_eq!(cfg.source, PathBuf::from("raw.csv"));
        assert_eq!(cfg.rules.min_year, 1990);
        assert_eq!(cfg.rules.max_year, 2023);
        assert_eq!(cfg.rules.misc_genre, "misc");
        assert_eq!(cfg.chunk_size, 100_000);
        assert!(cfg.resume);
    }

    #[test]
    fn test_prepare_defaults_match_config() {
        let cli = Cli::try_parse_from(["lyrics-pipeline", "prepare"]).unwrap();
        let Commands::Prepare(args) = cli.command else { panic!("expected prepare") };

        let cfg: PrepareConfig = args.into();
        let def = PrepareConfig::default();
        assert_eq!(cfg.block_size, def.block_size);
        assert_eq!(cfg.pad_token, def.pad_token);
        assert_eq!(cfg.artifacts_dir, def.artifacts_dir);
        assert_eq!(cfg.train_fraction, def.train_fraction);
    }

    #[test]
    fn test_tag_defaults_match_config() {
        let cli = Cli::try_parse_from(["lyrics-pipeline", "tag"]).unwrap();
        let Commands::Tag(args) = cli.command else { panic!("expected tag") };
        assert_eq!(args.allow_list, PathBuf::from("config/allow_list.json"));

        let cfg: TagConfig = args.into();
        assert_eq!(cfg.cap, TagConfig::default().cap);
        assert_eq!(cfg.corpus, TagConfig::default().corpus);
    }
}

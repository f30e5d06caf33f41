// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands each subcommand to its
// use case in Layer 2. Only this layer prints to stdout.
//
//   clean   — raw lyrics CSV → cleaned CSV
//   tag     — cleaned CSV → features CSV + tagged corpus
//   prepare — corpus → tokenised train/eval examples
//   strip   — generated text → display lyrics

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;

use commands::{CleanArgs, Commands, PrepareArgs, StripArgs, TagArgs};

#[derive(Parser, Debug)]
#[command(
    name = "lyrics-pipeline",
    version,
    about = "Clean song lyrics, build a genre/artist-tagged corpus, and prepare it for fine-tuning."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Clean(args)   => run_clean(args),
            Commands::Tag(args)     => run_tag(args),
            Commands::Prepare(args) => run_prepare(args),
            Commands::Strip(args)   => run_strip(args),
        }
    }
}

fn run_clean(args: CleanArgs) -> Result<()> {
    use crate::application::clean_use_case::{CleanOutcome, CleanUseCase};

    match CleanUseCase::new(args.into()).execute()? {
        CleanOutcome::Skipped => println!("Cleaned output already exists; nothing to do."),
        CleanOutcome::Completed { chunks, totals, resumed_from } => {
            if let Some(chunk) = resumed_from {
                println!("Resumed at chunk {chunk}.");
            }
            println!(
                "Cleaned {} rows in {} chunks: kept {}, dropped {}.",
                totals.rows_read,
                chunks,
                totals.rows_kept,
                totals.dropped()
            );
        }
    }
    Ok(())
}

fn run_tag(args: TagArgs) -> Result<()> {
    use crate::application::tag_use_case::{TagOutcome, TagUseCase};
    use crate::infra::config_store::load_allow_list;

    let allow_list = load_allow_list(&args.allow_list)?;
    let corpus     = args.corpus.clone();

    match TagUseCase::new(args.into(), allow_list).execute()? {
        TagOutcome::Skipped => println!("Tagged outputs already exist; nothing to do."),
        TagOutcome::Completed { entries, .. } => {
            println!("Wrote {} tagged songs to {}.", entries, corpus.display());
        }
    }
    Ok(())
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let out_dir = args.out_dir.clone();
    let splits  = PrepareUseCase::new(args.into()).execute()?;
    println!(
        "Prepared {} train and {} eval examples in {}.",
        splits.train.example_count(),
        splits.eval.example_count(),
        out_dir.display()
    );
    Ok(())
}

fn run_strip(args: StripArgs) -> Result<()> {
    use crate::ml::generator::strip_tags;

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read generated text from stdin")?;
            buf
        }
    };
    println!("{}", strip_tags(&raw));
    Ok(())
}

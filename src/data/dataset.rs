use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

/// One tokenised training block, padded/truncated to the block size.
/// `labels` mirrors `input_ids`; the trainer shifts them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsExample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub labels:         Vec<u32>,
}

impl LyricsExample {
    /// Number of real (non-padding) tokens.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

#[derive(Debug)]
pub struct LyricsDataset {
    examples: Vec<LyricsExample>,
}

impl LyricsDataset {
    pub fn new(examples: Vec<LyricsExample>) -> Self { Self { examples } }

    pub fn example_count(&self) -> usize { self.examples.len() }

    /// Load examples written by `save_jsonl`, one JSON object per line.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        let mut examples = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let example = serde_json::from_str(&line)
                .with_context(|| format!("Bad example on line {} of '{}'", n + 1, path.display()))?;
            examples.push(example);
        }
        Ok(Self::new(examples))
    }

    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        for example in &self.examples {
            serde_json::to_writer(&mut out, example)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Dataset<LyricsExample> for LyricsDataset {
    fn get(&self, index: usize) -> Option<LyricsExample> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}

// ============================================================
// Layer 5 — Example Encoder
// ============================================================
// Turns one tagged corpus block into a fixed-length training
// example for the external fine-tuning loop.
//
// Sequence layout (block_size = 8, pad = <|endoftext|>):
//   input_ids:      [s:genre] Pop [e:genre] ... hello <pad> <pad>
//   attention_mask: 1         1   1         ... 1     0     0
//   labels:         identical to input_ids
//
// Blocks longer than block_size are truncated from the end.

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::dataset::LyricsExample;
use crate::domain::error::PipelineError;

pub struct ExampleEncoder<'a> {
    tokenizer:  &'a Tokenizer,
    block_size: usize,
    pad_id:     u32,
}

impl<'a> ExampleEncoder<'a> {
    /// `pad_token` must already be in the tokenizer's vocabulary.
    pub fn new(tokenizer: &'a Tokenizer, block_size: usize, pad_token: &str) -> Result<Self> {
        if block_size == 0 {
            return Err(PipelineError::InvalidConfig("block_size must be at least 1".into()).into());
        }
        let pad_id = tokenizer.token_to_id(pad_token).ok_or_else(|| {
            PipelineError::InvalidConfig(format!("pad token '{pad_token}' is not in the vocabulary"))
        })?;
        Ok(Self { tokenizer, block_size, pad_id })
    }

    pub fn encode(&self, text: &str) -> Result<LyricsExample> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        let mut input_ids: Vec<u32> = enc.get_ids().to_vec();
        input_ids.truncate(self.block_size);

        let mut attention_mask = vec![1u32; input_ids.len()];
        while input_ids.len() < self.block_size {
            input_ids.push(self.pad_id);
            attention_mask.push(0);
        }

        Ok(LyricsExample {
            labels: input_ids.clone(),
            input_ids,
            attention_mask,
        })
    }
}

// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// concrete CSV reader and the external language model can be
// swapped for in-memory fakes in tests.

use anyhow::Result;

use crate::domain::song::Chunk;
use crate::domain::generation::GenerationConfig;

// ─── ChunkSource ──────────────────────────────────────────────────────────────
/// Anything that yields song records in bounded, ordered batches.
///
/// Implementations:
///   - CsvChunkReader → streams a delimited lyrics table from disk
pub trait ChunkSource {
    /// Return the next chunk, or None once the source is exhausted.
    fn next_chunk(&mut self) -> Result<Option<Chunk>>;
}

// ─── LyricsGenerator ─────────────────────────────────────────────────────────
/// A pretrained generative model that continues a tagged prompt.
///
/// Tokenisation, sampling and decoding are owned by the model
/// library behind this trait. The returned text is the raw decode,
/// control tags included.
pub trait LyricsGenerator {
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

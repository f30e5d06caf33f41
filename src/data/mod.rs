// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw lyrics table and the tagged corpus.
//
// The cleaner flows in this order:
//
//   lyrics.csv
//       │
//       ▼
//   CsvChunkReader    → fixed-size batches of SongRecords
//       │
//       ▼
//   ChunkFilter       → fixed-order predicates + Preprocessor
//       │
//       ▼
//   AppendWriter      → lyrics_processed.csv, header once
//
// The tagger reads the cleaned table back in full and picks rows
// per (genre, artist) with the ArtistSelector. The preparer splits
// tokenised examples with the splitter and stores them as a
// LyricsDataset.

/// Streams a lyrics CSV in fixed-size chunks
pub mod loader;

/// Normalises scraped lyric text
pub mod preprocessor;

/// Ordered cleaning predicates and per-chunk stats
pub mod filters;

/// Append-mode CSV writer for the cleaned table
pub mod writer;

/// Per-artist, popularity-capped row selection
pub mod selector;

/// Tokenised examples exposed as a burn Dataset
pub mod dataset;

/// Shuffles and splits examples into train/eval sets
pub mod splitter;

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits describing songs, chunks,
// corpus blocks and allow-lists.
//
// Rules for this layer:
//   - NO file I/O
//   - NO tokenizer or model types
//   - Only plain Rust data and the traits other layers implement

// One parsed song row, its dedup key, and row batches
pub mod song;

// The tagged training block format
pub mod corpus_entry;

// Genre display names and per-genre artist allow-lists
pub mod allow_list;

// Sampling settings for the external generator
pub mod generation;

// Typed failures surfaced to the CLI
pub mod error;

// Seams for record sources and the external model
pub mod traits;

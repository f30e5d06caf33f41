// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by several use cases:
//
//   checkpoint.rs      — cleaner run manifest for --resume
//   metrics.rs         — per-chunk filter statistics CSV
//   tokenizer_store.rs — model artifact layout and tokenizer loading
//   config_store.rs    — allow-list loading, run-config saving

/// Cleaner run manifest
pub mod checkpoint;

/// Per-chunk statistics CSV logger
pub mod metrics;

/// Model artifacts and tokenizer loading
pub mod tokenizer_store;

/// JSON config files
pub mod config_store;

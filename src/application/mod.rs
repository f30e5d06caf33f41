// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case drives one pipeline stage end to end by calling
// into the data, ml and infra layers.
//
// Rules for this layer:
//   - No text munging or tokenizer code here
//   - No printing here (that's Layer 1)
//   - Decides order, skip/resume policy and what gets logged
//
//   clean    raw CSV      → cleaned CSV
//   tag      cleaned CSV  → features CSV + tagged corpus
//   prepare  corpus       → train/eval JSONL examples
//   generate prompt spec  → display lyrics (external model)

// Chunked cleaning of the raw lyrics table
pub mod clean_use_case;

// Per-artist selection and corpus tagging
pub mod tag_use_case;

// Tokenised example preparation for fine-tuning
pub mod prepare_use_case;

// Prompting an external generator and stripping its output
pub mod generate_use_case;

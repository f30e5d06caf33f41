// ============================================================
// Layer 5 — Model-Facing Layer
// ============================================================
// The only layer that touches the tokenizer or talks about model
// inputs and outputs. The pretrained model and its training loop
// are external; this layer prepares what goes in and cleans up
// what comes out.
//
//   encoder.rs   — corpus block → fixed-length token example
//   generator.rs — conditioning prompt and tag stripping of
//                  generated text

/// Fixed-length example encoding with the HuggingFace tokenizer
pub mod encoder;

/// Prompt construction and generated-text post-processing
pub mod generator;

// ============================================================
// Layer 3 — Generation Settings
// ============================================================
// Sampling knobs passed through the LyricsGenerator seam. Plain
// data: the model library that honours them lives outside the
// crate.

use serde::{Deserialize, Serialize};

use crate::domain::corpus_entry::LYRICS_END;
use crate::domain::error::PipelineError;

/// Sampling settings handed to the model library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub min_length:           usize,
    pub max_length:           usize,
    pub top_k:                usize,
    pub top_p:                f64,
    pub temperature:          f64,
    pub no_repeat_ngram_size: usize,
    /// Generation stops once this marker is produced
    pub stop_marker:          String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_length:           200,
            max_length:           600,
            top_k:                50,
            top_p:                0.9,
            temperature:          0.8,
            no_repeat_ngram_size: 2,
            stop_marker:          LYRICS_END.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let problem = if self.min_length > self.max_length {
            Some("min_length must not exceed max_length".to_string())
        } else if self.top_k == 0 {
            Some("top_k must be at least 1".to_string())
        } else if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            Some(format!("top_p must be in (0, 1], got {}", self.top_p))
        } else if self.temperature <= 0.0 {
            Some(format!("temperature must be positive, got {}", self.temperature))
        } else {
            None
        };
        problem.map_or(Ok(()), |p| Err(PipelineError::InvalidConfig(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
        let bad = GenerationConfig { top_p: 0.0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = GenerationConfig { min_length: 700, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_default_stops_at_lyrics_end() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.stop_marker, "[e:lyrics]");
        assert_eq!((cfg.min_length, cfg.max_length, cfg.top_k), (200, 600, 50));
    }
}

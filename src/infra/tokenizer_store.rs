// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// Locates the pretrained model artifacts and loads the tokenizer.
//
// Expected layout:
//   models/gpt2/
//     tokenizer/tokenizer.json   ← serialized HuggingFace tokenizer
//     model/                     ← checkpoint, read by the model library
//
// The eight corpus markers ([s:genre] … [e:lyrics]) are registered
// as special tokens on every load so each marker encodes to a
// single id instead of being split into sub-words.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokenizers::{AddedToken, Tokenizer};

use crate::domain::corpus_entry::ALL_MARKERS;
use crate::domain::error::PipelineError;

pub struct ModelArtifacts {
    root: PathBuf,
}

impl ModelArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.root.join("tokenizer").join("tokenizer.json")
    }

    pub fn model_dir(&self) -> PathBuf {
        self.root.join("model")
    }

    /// Check that both the tokenizer and the model checkpoint exist.
    pub fn verify(&self) -> Result<(), PipelineError> {
        let tokenizer = self.tokenizer_path();
        if !tokenizer.is_file() {
            return Err(PipelineError::MissingArtifact(tokenizer));
        }
        let model = self.model_dir();
        if !model.is_dir() {
            return Err(PipelineError::MissingArtifact(model));
        }
        Ok(())
    }

    /// Load the tokenizer and register the corpus markers.
    pub fn load_tokenizer(&self) -> Result<Tokenizer> {
        let path = self.tokenizer_path();
        if !path.is_file() {
            return Err(PipelineError::MissingArtifact(path).into());
        }

        let mut tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })?;
        let added = register_markers(&mut tokenizer);

        tracing::info!(
            "Loaded tokenizer from '{}' ({} new marker tokens)",
            path.display(),
            added
        );
        Ok(tokenizer)
    }
}

/// Add the corpus markers as special tokens; returns how many were new.
pub fn register_markers(tokenizer: &mut Tokenizer) -> usize {
    let markers: Vec<AddedToken> = ALL_MARKERS
        .iter()
        .map(|m| AddedToken::from(m.to_string(), true))
        .collect();
    tokenizer.add_special_tokens(&markers)
}

/// Write a tiny word-level tokenizer for tests.
#[cfg(test)]
pub(crate) fn write_test_tokenizer(root: &Path, words: &[&str]) -> PathBuf {
    let mut vocab = serde_json::json!({
        "<|endoftext|>": 0,
        "[UNK]":         1,
    });
    for (i, word) in words.iter().enumerate() {
        vocab[*word] = serde_json::json!(i + 2);
    }

    let tokenizer_json = serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0, "content": "<|endoftext|>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    });

    let dir = root.join("tokenizer");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tokenizer.json");
    std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json).unwrap()).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_encode_as_single_tokens() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path(), &["Pop", "hello"]);

        let tokenizer = ModelArtifacts::new(dir.path()).load_tokenizer().unwrap();
        let enc = tokenizer.encode("[s:genre]Pop[e:genre] hello", false).unwrap();

        let genre_start = tokenizer.token_to_id("[s:genre]").unwrap();
        let genre_end   = tokenizer.token_to_id("[e:genre]").unwrap();
        let pop         = tokenizer.token_to_id("Pop").unwrap();
        let hello       = tokenizer.token_to_id("hello").unwrap();
        assert_eq!(enc.get_ids(), &[genre_start, pop, genre_end, hello]);
    }

    #[test]
    fn test_missing_tokenizer_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelArtifacts::new(dir.path()).load_tokenizer().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingArtifact(_))
        ));
    }

    #[test]
    fn test_verify_requires_model_dir() {
        let dir       = tempfile::tempdir().unwrap();
        let artifacts = ModelArtifacts::new(dir.path());
        write_test_tokenizer(dir.path(), &[]);
        assert!(matches!(artifacts.verify(), Err(PipelineError::MissingArtifact(p)) if p == artifacts.model_dir()));

        std::fs::create_dir_all(artifacts.model_dir()).unwrap();
        assert!(artifacts.verify().is_ok());
    }
}

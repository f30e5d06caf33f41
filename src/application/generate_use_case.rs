// ============================================================
// Layer 2 — GenerateUseCase
// ============================================================
// Conditioned lyric generation around an external model:
//
//   prompt spec ──build_prompt──▶ "[s:genre]Rap[e:genre] … [s:lyrics] …"
//               ──LyricsGenerator::generate──▶ raw decode
//               ──strip_tags──▶ display text
//
// The generator is any LyricsGenerator; `open` checks the model
// artifacts exist before handing them to the caller's loader.

use anyhow::Result;

use crate::domain::{generation::GenerationConfig, traits::LyricsGenerator};
use crate::infra::tokenizer_store::ModelArtifacts;
use crate::ml::generator::{build_prompt, strip_tags, PromptSpec};

pub struct GenerateUseCase<G: LyricsGenerator> {
    generator: G,
    config:    GenerationConfig,
}

impl<G: LyricsGenerator> GenerateUseCase<G> {
    pub fn new(generator: G, config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { generator, config })
    }

    /// Verify the artifact layout, then build the generator from it.
    pub fn open<F>(artifacts: &ModelArtifacts, config: GenerationConfig, load: F) -> Result<Self>
    where
        F: FnOnce(&ModelArtifacts) -> Result<G>,
    {
        config.validate()?;
        artifacts.verify()?;
        tracing::info!("Loading model from '{}'", artifacts.root().display());
        let generator = load(artifacts)?;
        Ok(Self { generator, config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate(&self, spec: &PromptSpec) -> Result<String> {
        let prompt = build_prompt(spec);
        tracing::debug!("Prompt: {prompt}");

        let raw    = self.generator.generate(&prompt, &self.config)?;
        let lyrics = strip_tags(&raw);
        if lyrics.is_empty() {
            tracing::warn!("Generation for genre '{}' produced no lyrics", spec.genre);
        }
        Ok(lyrics)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::infra::tokenizer_store::write_test_tokenizer;
    use std::cell::RefCell;

    /// Echoes the prompt and appends a canned continuation.
    struct EchoGenerator {
        continuation: String,
        seen:         RefCell<Vec<(String, usize)>>,
    }

    impl EchoGenerator {
        fn new(continuation: &str) -> Self {
            Self { continuation: continuation.into(), seen: RefCell::new(Vec::new()) }
        }
    }

    impl LyricsGenerator for EchoGenerator {
        fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
            self.seen.borrow_mut().push((prompt.to_string(), config.max_length));
            Ok(format!("{prompt}{}", self.continuation))
        }
    }

    fn spec() -> PromptSpec {
        PromptSpec {
            genre:   "Rap".into(),
            artist:  Some("Nas".into()),
            year:    Some(1994),
            opening: "Straight out the dungeons".into(),
        }
    }

    #[test]
    fn test_generate_strips_prompt_tags_and_tail() {
        let gen = EchoGenerator::new(" of rap\nwhere brothers [e:lyrics] [s:genre]Pop");
        let uc  = GenerateUseCase::new(gen, GenerationConfig::default()).unwrap();

        let lyrics = uc.generate(&spec()).unwrap();
        assert_eq!(lyrics, "Straight out the dungeons of rap\nwhere brothers");

        let seen = uc.generator.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.starts_with("[s:genre]Rap[e:genre] [s:artist]Nas[e:artist]"));
        assert_eq!(seen[0].1, 600);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = GenerationConfig { temperature: 0.0, ..Default::default() };
        assert!(GenerateUseCase::new(EchoGenerator::new(""), bad).is_err());
    }

    #[test]
    fn test_open_requires_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path(), &["hello"]);
        let artifacts = ModelArtifacts::new(dir.path());

        let err = GenerateUseCase::open(&artifacts, GenerationConfig::default(), |_| {
            Ok(EchoGenerator::new(""))
        })
        .err()
        .unwrap();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingArtifact(p)) if p.ends_with("model")
        ));

        std::fs::create_dir_all(artifacts.model_dir()).unwrap();
        let uc = GenerateUseCase::open(&artifacts, GenerationConfig::default(), |a| {
            assert!(a.model_dir().is_dir());
            Ok(EchoGenerator::new(" la la"))
        })
        .unwrap();
        assert_eq!(uc.generate(&spec()).unwrap(), "Straight out the dungeons la la");
    }
}

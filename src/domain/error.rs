use std::path::PathBuf;

use thiserror::Error;

/// Failures the pipeline reports by kind rather than by message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source file '{0}' does not exist")]
    SourceNotFound(PathBuf),
    #[error("'{path}' is missing required columns: {}", missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },
    #[error("genre '{0}' has no display name in the allow-list")]
    UnmappedGenre(String),
    #[error("no tagged blocks found in corpus '{0}'")]
    EmptyCorpus(PathBuf),
    #[error("model artifact '{0}' is missing")]
    MissingArtifact(PathBuf),
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

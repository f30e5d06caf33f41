// ============================================================
// Layer 6 — Run Manifest (Cleaner Checkpoint)
// ============================================================
// Records how far a cleaner run got, next to its output file:
//
//   data/processed/
//     lyrics_processed.csv                ← appended chunk by chunk
//     lyrics_processed.csv.manifest.json  ← updated after every chunk
//
// The manifest holds the byte length of the output at the moment
// the last chunk was flushed. A resumed run truncates the output
// back to that length, so a chunk that was half-written when the
// process died is discarded rather than duplicated.
//
// The manifest is written to a temporary file and renamed into
// place so a reader never sees a partial JSON document.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Progress of one cleaner run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub source:       PathBuf,
    pub chunk_size:   usize,
    /// Index of the last chunk whose survivors were flushed
    pub last_chunk:   Option<usize>,
    pub rows_written: u64,
    /// Output file length after the last flush, header included
    pub output_len:   u64,
    pub completed:    bool,
}

impl RunManifest {
    pub fn start(source: impl Into<PathBuf>, chunk_size: usize, output_len: u64) -> Self {
        Self {
            source: source.into(),
            chunk_size,
            last_chunk: None,
            rows_written: 0,
            output_len,
            completed: false,
        }
    }

    /// First chunk index a resumed run still has to process.
    pub fn next_chunk(&self) -> usize {
        self.last_chunk.map_or(0, |c| c + 1)
    }

    /// A manifest can drive a resume only if the run stopped early
    /// and used the same chunking.
    pub fn can_resume_with(&self, chunk_size: usize) -> bool {
        !self.completed && self.chunk_size == chunk_size
    }
}

pub struct CheckpointManager {
    path: PathBuf,
}

impl CheckpointManager {
    /// Manifest that belongs to `output`: `<output>.manifest.json`.
    pub fn for_output(output: &Path) -> Self {
        let mut name = output
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".manifest.json");
        Self { path: output.with_file_name(name) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the manifest; Ok(None) when there is none yet.
    pub fn load(&self) -> Result<Option<RunManifest>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read manifest '{}'", self.path.display()))?;
        let manifest = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt manifest '{}'", self.path.display()))?;
        Ok(Some(manifest))
    }

    pub fn save(&self, manifest: &RunManifest) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(manifest)?)
            .with_context(|| format!("Cannot write manifest '{}'", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Cannot move manifest into '{}'", self.path.display()))?;

        tracing::trace!(
            "Manifest: chunk {:?}, {} rows, {} bytes",
            manifest.last_chunk,
            manifest.rows_written,
            manifest.output_len
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_sits_next_to_output() {
        let ckpt = CheckpointManager::for_output(Path::new("data/processed/lyrics.csv"));
        assert_eq!(ckpt.path(), Path::new("data/processed/lyrics.csv.manifest.json"));
    }

    #[test]
    fn test_save_then_load() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::for_output(&dir.path().join("out.csv"));
        assert!(ckpt.load().unwrap().is_none());

        let mut m = RunManifest::start("raw.csv", 1000, 42);
        m.last_chunk   = Some(3);
        m.rows_written = 17;
        ckpt.save(&m).unwrap();

        let loaded = ckpt.load().unwrap().unwrap();
        assert_eq!(loaded, m);
        assert_eq!(loaded.next_chunk(), 4);
    }

    #[test]
    fn test_resume_rules() {
        let mut m = RunManifest::start("raw.csv", 1000, 0);
        assert_eq!(m.next_chunk(), 0);
        assert!(m.can_resume_with(1000));
        assert!(!m.can_resume_with(500));
        m.completed = true;
        assert!(!m.can_resume_with(1000));
    }
}

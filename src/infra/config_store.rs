// ============================================================
// Layer 6 — Config Store
// ============================================================
// Reads the allow-list JSON and writes run configs next to the
// artifacts they produced, so a later step can see which settings
// built them.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

use crate::domain::allow_list::AllowList;

/// Load and validate an allow-list file.
///
/// ```json
/// { "genre_names": { "rb": "R&B" }, "artists": { "rb": ["SZA", "Usher"] } }
/// ```
pub fn load_allow_list(path: impl AsRef<Path>) -> Result<AllowList> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read allow-list '{}'", path.display()))?;
    let list: AllowList = serde_json::from_str(&json)
        .with_context(|| format!("Malformed allow-list '{}'", path.display()))?;
    list.validate()?;

    tracing::debug!(
        "Allow-list '{}': {} genres, {} artists",
        path.display(),
        list.artists.len(),
        list.artists.values().map(Vec::len).sum::<usize>()
    );
    Ok(list)
}

/// Write any config as pretty JSON.
pub fn save_config<T: Serialize>(config: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
    tracing::debug!("Saved config to '{}'", path.display());
    Ok(())
}

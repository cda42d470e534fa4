//! Small persisted UI preferences (selected Bible translation).

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefs {
    pub version: u32,
    /// Translation version code used for verse word counts. `None` means
    /// follow the default version from the verses document.
    #[serde(default)]
    pub bible_version: Option<String>,
}

impl Default for Prefs {
    fn default() -> Self {
        Self::new()
    }
}

impl Prefs {
    pub fn new() -> Self {
        Self {
            version: 1,
            bible_version: None,
        }
    }

    /// Resolve the effective version code against the document default.
    pub fn effective_version<'a>(&'a self, default_version: &'a str) -> &'a str {
        self.bible_version.as_deref().unwrap_or(default_version)
    }
}

/// Get the default preferences file path (~/.config/placar/prefs.json)
pub fn get_prefs_path() -> PathBuf {
    crate::config::get_config_dir().join("prefs.json")
}

/// Load preferences from a JSON file
///
/// If the file doesn't exist, returns defaults.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_prefs(path: &Path) -> Result<Prefs> {
    if !path.exists() {
        return Ok(Prefs::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open preferences file at {}", path.display()))?;

    let prefs: Prefs = serde_json::from_reader(file).context("Failed to load preferences")?;

    if prefs.version != 1 {
        anyhow::bail!("Unsupported preferences version: {}", prefs.version);
    }

    Ok(prefs)
}

/// Save preferences to a JSON file atomically
///
/// Uses atomic-write-file so the file is never left in a corrupted state.
/// Creates the config directory if it doesn't exist.
pub fn save_prefs(path: &Path, prefs: &Prefs) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, prefs).context("Failed to serialize preferences")?;

    file.commit().context("Failed to save preferences")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_path = env::temp_dir().join("placar_test_prefs_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let prefs = load_prefs(&temp_path).unwrap();
        assert_eq!(prefs.version, 1);
        assert!(prefs.bible_version.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("placar_test_prefs_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut prefs = Prefs::new();
        prefs.bible_version = Some("ARA".to_string());
        save_prefs(&temp_path, &prefs).unwrap();

        let loaded = load_prefs(&temp_path).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.bible_version.as_deref(), Some("ARA"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_effective_version_falls_back_to_default() {
        let mut prefs = Prefs::new();
        assert_eq!(prefs.effective_version("NVI"), "NVI");

        prefs.bible_version = Some("ARA".to_string());
        assert_eq!(prefs.effective_version("NVI"), "ARA");
    }
}

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::get_config_path;

const SAMPLE_CONFIG: &str = r#"# placar configuration
#
# Identity shown in the title bar and plain output.
app:
  name: "Embaixadores do Rei"
  short_name: "Embaixada"
  # organization: "Igreja Batista Central"
  # Hosted leaderboard site for the `open` command:
  # site_url: "https://embaixada.example.org"

# Activity types expected in the attendance data, in display order.
activity_types: [embaixada, igreja, pg]

# Tabs and score categories can be switched off per group.
features:
  bible_verses: true
  visitor_tracking: true
  games: true
  candidato_progress: false
  attendance_calendar: true

# Vocabulary used across the UI.
terminology:
  participant: "Embaixador"
  participants: "Embaixadores"
  attendance: "Presença"
  season: "Temporada"

# Where the JSON snapshot documents live. Either a base_url serving
# leaderboard.json / verses.json / games.json / bonus.json, or a local dir.
data:
  base_url: "https://embaixada.example.org/data"
  # dir: "./data"
  cache_max_age: "1h"

# Optional HSL theme colors, same format as the site theme config.
# theme:
#   primary: "220 82% 24%"
#   accent: "43 96% 56%"
"#;

/// Write a commented sample config for the user to edit.
///
/// Refuses to overwrite an existing file: the config is hand-maintained.
pub fn write_sample_config(path: Option<PathBuf>) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() {
        anyhow::bail!(
            "Config already exists at {}. Edit it directly or remove it first.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate_config, Config};

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config: Config = serde_saphyr::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.app.name, "Embaixadores do Rei");
        assert_eq!(config.activity_types, ["embaixada", "igreja", "pg"]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let temp_path = std::env::temp_dir().join("placar_test_init_existing.yaml");
        std::fs::write(&temp_path, "app:\n  name: x\n").unwrap();

        let result = write_sample_config(Some(temp_path.clone()));
        assert!(result.is_err());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_writes_sample_to_fresh_path() {
        let temp_path = std::env::temp_dir().join("placar_test_init_fresh.yaml");
        let _ = std::fs::remove_file(&temp_path);

        let written = write_sample_config(Some(temp_path.clone())).unwrap();
        assert_eq!(written, temp_path);
        let content = std::fs::read_to_string(&temp_path).unwrap();
        assert!(content.contains("base_url"));

        let _ = std::fs::remove_file(&temp_path);
    }
}

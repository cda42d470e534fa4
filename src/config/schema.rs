use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
///
/// One YAML file drives identity, terminology, feature gating, the data
/// source, and theming, so the same binary serves differently-themed
/// groups without code changes.
///
/// Example YAML:
/// ```yaml
/// app:
///   name: "Embaixadores do Rei"
///   short_name: "Embaixada"
///   site_url: "https://embaixada.example.org"
/// activity_types: [embaixada, igreja, pg]
/// features:
///   candidato_progress: true
/// data:
///   base_url: "https://embaixada.example.org/data"
///   cache_max_age: "1h"
/// theme:
///   primary: "220 82% 24%"
///   accent: "43 96% 56%"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub app: AppSection,

    /// Activity types expected in the data, in display order. Types not
    /// listed here still score and render, with a capitalized default
    /// label.
    #[serde(default)]
    pub activity_types: Vec<String>,

    #[serde(default)]
    pub features: Features,

    #[serde(default)]
    pub terminology: Terminology,

    pub data: DataSection,

    #[serde(default)]
    pub theme: Option<ThemeSection>,
}

impl Config {
    /// Display label for an activity type. Known and unknown types get the
    /// same treatment: first letter capitalized.
    pub fn activity_label(&self, activity_type: &str) -> String {
        let mut chars = activity_type.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    /// Hosted leaderboard site, used by the `open` command and the TUI.
    #[serde(default)]
    pub site_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Features {
    #[serde(default = "default_true")]
    pub bible_verses: bool,
    #[serde(default = "default_true")]
    pub visitor_tracking: bool,
    #[serde(default = "default_true")]
    pub games: bool,
    #[serde(default)]
    pub candidato_progress: bool,
    #[serde(default = "default_true")]
    pub attendance_calendar: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            bible_verses: true,
            visitor_tracking: true,
            games: true,
            candidato_progress: false,
            attendance_calendar: true,
        }
    }
}

/// Words the UI uses for the group's own vocabulary ("Embaixador" vs
/// "Desbravador" vs plain "Participante").
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Terminology {
    #[serde(default = "default_participant")]
    pub participant: String,
    #[serde(default = "default_participants")]
    pub participants: String,
    #[serde(default = "default_attendance")]
    pub attendance: String,
    #[serde(default = "default_season")]
    pub season: String,
}

impl Default for Terminology {
    fn default() -> Self {
        Self {
            participant: default_participant(),
            participants: default_participants(),
            attendance: default_attendance(),
            season: default_season(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataSection {
    /// Base URL serving leaderboard.json, verses.json, games.json and
    /// bonus.json.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Local directory holding the same documents. Takes precedence over
    /// `base_url` when both are set.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// How long cached documents are served without revalidation
    /// (humantime format, e.g. "1h", "30m").
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: String,
}

/// Theme colors as HSL triples, the format the site theme config uses
/// (e.g. "220 82% 24%"). Absent values fall back to the terminal palette.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeSection {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_participant() -> String {
    "Participante".to_string()
}

fn default_participants() -> String {
    "Participantes".to_string()
}

fn default_attendance() -> String {
    "Presença".to_string()
}

fn default_season() -> String {
    "Temporada".to_string()
}

fn default_cache_max_age() -> String {
    "1h".to_string()
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push("app.name: must not be empty".to_string());
    }

    if config.data.base_url.is_none() && config.data.dir.is_none() {
        errors.push("data: set either base_url or dir".to_string());
    }

    if let Some(ref url) = config.data.base_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(format!("data.base_url: not an http(s) URL: '{}'", url));
        }
    }

    if let Err(e) = humantime::parse_duration(&config.data.cache_max_age) {
        errors.push(format!(
            "data.cache_max_age: invalid duration '{}' - {}",
            config.data.cache_max_age, e
        ));
    }

    if let Some(ref theme) = config.theme {
        for (field, value) in [
            ("primary", &theme.primary),
            ("accent", &theme.accent),
            ("background", &theme.background),
            ("foreground", &theme.foreground),
        ] {
            if let Some(hsl) = value {
                if crate::tui::theme::parse_hsl(hsl).is_none() {
                    errors.push(format!(
                        "theme.{}: invalid HSL triple '{}' (expected e.g. \"220 82% 24%\")",
                        field, hsl
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        r#"
app:
  name: "Embaixadores do Rei"
data:
  base_url: "https://example.org/data"
"#
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = serde_saphyr::from_str(minimal_yaml()).unwrap();
        assert_eq!(config.app.name, "Embaixadores do Rei");
        assert!(config.features.bible_verses);
        assert!(!config.features.candidato_progress);
        assert_eq!(config.terminology.participant, "Participante");
        assert_eq!(config.data.cache_max_age, "1h");
        assert!(config.theme.is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
app:
  name: "Embaixadores do Rei"
  short_name: "Embaixada"
  organization: "IBC"
  site_url: "https://embaixada.example.org"
activity_types: [embaixada, igreja, pg]
features:
  bible_verses: true
  visitor_tracking: true
  games: true
  candidato_progress: true
  attendance_calendar: true
terminology:
  participant: "Embaixador"
  participants: "Embaixadores"
  attendance: "Presença"
  season: "Temporada"
data:
  base_url: "https://embaixada.example.org/data"
  cache_max_age: "30m"
theme:
  primary: "220 82% 24%"
  accent: "43 96% 56%"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.activity_types.len(), 3);
        assert_eq!(config.terminology.participant, "Embaixador");
        assert!(config.features.candidato_progress);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_data_source_is_an_error() {
        let yaml = r#"
app:
  name: "Embaixada"
data: {}
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("data:")));
    }

    #[test]
    fn test_invalid_cache_max_age_is_an_error() {
        let yaml = r#"
app:
  name: "Embaixada"
data:
  base_url: "https://example.org/data"
  cache_max_age: "soon"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("cache_max_age"));
    }

    #[test]
    fn test_collects_all_errors() {
        let yaml = r#"
app:
  name: ""
data:
  base_url: "ftp://example.org"
  cache_max_age: "soon"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_activity_label_capitalizes() {
        let config: Config = serde_saphyr::from_str(minimal_yaml()).unwrap();
        assert_eq!(config.activity_label("embaixada"), "Embaixada");
        assert_eq!(config.activity_label("pg"), "Pg");
        assert_eq!(config.activity_label(""), "");
    }
}

use anyhow::{Context, Result};
use http::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::config::Config;
use crate::data::cache::{get_cache_path, CacheConfig, DocumentCache};
use crate::data::types::{BonusData, GamesData, LeaderboardData, VersesData};

pub const LEADERBOARD_DOC: &str = "leaderboard.json";
pub const VERSES_DOC: &str = "verses.json";
pub const GAMES_DOC: &str = "games.json";
pub const BONUS_DOC: &str = "bonus.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A complete, already-resolved set of documents. The scoring and
/// attendance code only ever sees one of these; it knows nothing about
/// loading or partial availability.
pub struct Snapshot {
    pub leaderboard: LeaderboardData,
    pub verses: Option<VersesData>,
    pub games: Option<GamesData>,
    pub bonus: Option<BonusData>,
    /// Optional documents that failed to load. Shown to the user; never
    /// fatal.
    pub warnings: Vec<String>,
}

/// Load all documents for one render: the leaderboard document is
/// required, the rest degrade to `None` (with a warning) on failure or
/// when their feature is off. Documents are fetched concurrently.
pub async fn load_snapshot(
    config: &Config,
    cache_config: &CacheConfig,
    verbose: bool,
) -> Result<Snapshot> {
    if let Some(ref dir) = config.data.dir {
        return load_snapshot_from_dir(config, dir, verbose);
    }

    let base_url = config
        .data
        .base_url
        .as_deref()
        .context("No data source configured: set data.base_url or data.dir")?;
    let base_url = base_url.trim_end_matches('/');

    if verbose {
        let cache_status = if cache_config.enabled {
            "enabled"
        } else {
            "disabled (--no-cache)"
        };
        eprintln!("Cache: {}", cache_status);
    }

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;
    let store = DocumentCache::new(get_cache_path());

    let leaderboard_url = doc_url(base_url, LEADERBOARD_DOC);
    let verses_url = doc_url(base_url, VERSES_DOC);
    let games_url = doc_url(base_url, GAMES_DOC);
    let bonus_url = doc_url(base_url, BONUS_DOC);

    let (leaderboard_body, verses_body, games_body, bonus_body) = tokio::join!(
        fetch_document(&client, &store, cache_config, &leaderboard_url, verbose),
        fetch_if(
            config.features.bible_verses,
            &client,
            &store,
            cache_config,
            &verses_url,
            verbose,
        ),
        fetch_if(
            config.features.games,
            &client,
            &store,
            cache_config,
            &games_url,
            verbose,
        ),
        fetch_if(
            config.features.games,
            &client,
            &store,
            cache_config,
            &bonus_url,
            verbose,
        ),
    );

    let leaderboard: LeaderboardData =
        parse_document(LEADERBOARD_DOC, &leaderboard_body?)?;

    let mut warnings = Vec::new();
    let verses = parse_optional(VERSES_DOC, verses_body, &mut warnings);
    let games = parse_optional(GAMES_DOC, games_body, &mut warnings);
    let bonus = parse_optional(BONUS_DOC, bonus_body, &mut warnings);

    Ok(Snapshot {
        leaderboard,
        verses,
        games,
        bonus,
        warnings,
    })
}

fn doc_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url, name)
}

/// Fetch one document, honoring the cache policy.
///
/// Fresh cache entries are served directly. Stale entries revalidate with
/// `If-None-Match`; a 304 reuses the cached body and restarts its age.
async fn fetch_document(
    client: &reqwest::Client,
    store: &DocumentCache,
    cache_config: &CacheConfig,
    url: &str,
    verbose: bool,
) -> Result<String> {
    let cached = if cache_config.enabled {
        store.lookup(url)
    } else {
        None
    };

    if let Some(ref entry) = cached {
        if entry.age() < cache_config.max_age {
            if verbose {
                eprintln!("  {} served from cache", url);
            }
            return Ok(entry.body.clone());
        }
    }

    // Retry strategy: exponential backoff with 3 attempts
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    let etag = cached.as_ref().and_then(|entry| entry.etag.clone());
    let response = Retry::spawn(retry_strategy, || async {
        let mut request = client.get(url);
        if let Some(ref tag) = etag {
            request = request.header(IF_NONE_MATCH, tag);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        if response.status().is_server_error() {
            anyhow::bail!("Server error {} for {}", response.status(), url);
        }
        Ok(response)
    })
    .await?;

    if response.status() == StatusCode::NOT_MODIFIED {
        if let Some(entry) = cached {
            if verbose {
                eprintln!("  {} not modified, cache revalidated", url);
            }
            let _ = store.store(url, entry.etag.clone(), entry.body.clone());
            return Ok(entry.body);
        }
        anyhow::bail!("Got 304 for {} without a cached copy", url);
    }

    if !response.status().is_success() {
        anyhow::bail!("HTTP {} for {}", response.status(), url);
    }

    let etag = response
        .headers()
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;

    if cache_config.enabled {
        // Best effort: a failed cache write must not fail the fetch.
        let _ = store.store(url, etag, body.clone());
    }

    Ok(body)
}

/// Fetch an optional document, or report it absent when its feature is
/// off.
async fn fetch_if(
    enabled: bool,
    client: &reqwest::Client,
    store: &DocumentCache,
    cache_config: &CacheConfig,
    url: &str,
    verbose: bool,
) -> Option<Result<String>> {
    if !enabled {
        return None;
    }
    Some(fetch_document(client, store, cache_config, url, verbose).await)
}

fn parse_document<T: DeserializeOwned>(name: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).with_context(|| format!("Failed to parse {}", name))
}

fn parse_optional<T: DeserializeOwned>(
    name: &str,
    body: Option<Result<String>>,
    warnings: &mut Vec<String>,
) -> Option<T> {
    match body? {
        Ok(body) => match parse_document(name, &body) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warnings.push(format!("{}: {}", name, e));
                None
            }
        },
        Err(e) => {
            warnings.push(format!("{}: {}", name, e));
            None
        }
    }
}

/// Offline source: the same documents read from a local directory.
fn load_snapshot_from_dir(config: &Config, dir: &Path, verbose: bool) -> Result<Snapshot> {
    if verbose {
        eprintln!("Reading documents from {}", dir.display());
    }

    let leaderboard_body = std::fs::read_to_string(dir.join(LEADERBOARD_DOC))
        .with_context(|| format!("Failed to read {}", dir.join(LEADERBOARD_DOC).display()))?;
    let leaderboard: LeaderboardData = parse_document(LEADERBOARD_DOC, &leaderboard_body)?;

    let mut warnings = Vec::new();
    let verses = read_optional(config.features.bible_verses, dir, VERSES_DOC, &mut warnings);
    let games = read_optional(config.features.games, dir, GAMES_DOC, &mut warnings);
    let bonus = read_optional(config.features.games, dir, BONUS_DOC, &mut warnings);

    Ok(Snapshot {
        leaderboard,
        verses,
        games,
        bonus,
        warnings,
    })
}

fn read_optional<T: DeserializeOwned>(
    enabled: bool,
    dir: &Path,
    name: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    if !enabled {
        return None;
    }
    let path = dir.join(name);
    if !path.exists() {
        // Optional documents may simply not be published yet.
        return None;
    }
    let body = match std::fs::read_to_string(&path) {
        Ok(body) => body,
        Err(e) => {
            warnings.push(format!("{}: {}", name, e));
            return None;
        }
    };
    match parse_document(name, &body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warnings.push(format!("{}: {}", name, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn dir_config(dir: &Path) -> Config {
        let yaml = format!(
            "app:\n  name: Embaixada\ndata:\n  dir: \"{}\"\n",
            dir.display()
        );
        serde_saphyr::from_str(&yaml).unwrap()
    }

    fn cache_config() -> CacheConfig {
        CacheConfig {
            enabled: false,
            max_age: Duration::from_secs(3600),
        }
    }

    fn write_leaderboard(dir: &Path) {
        std::fs::write(
            dir.join(LEADERBOARD_DOC),
            r#"{
                "season": "2026.1",
                "updatedAt": "2026-02-01T12:00:00Z",
                "rules": [],
                "participants": [{"id": 1, "name": "Ana"}]
            }"#,
        )
        .unwrap();
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("placar_test_fetch_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_from_dir_leaderboard_only() {
        let dir = temp_dir("leaderboard_only");
        write_leaderboard(&dir);

        let snapshot = load_snapshot(&dir_config(&dir), &cache_config(), false)
            .await
            .unwrap();
        assert_eq!(snapshot.leaderboard.participants.len(), 1);
        assert!(snapshot.verses.is_none());
        assert!(snapshot.games.is_none());
        // Missing optional documents are not warnings.
        assert!(snapshot.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_dir_missing_leaderboard_fails() {
        let dir = temp_dir("missing_leaderboard");
        let result = load_snapshot(&dir_config(&dir), &cache_config(), false).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_malformed_optional_document_becomes_warning() {
        let dir = temp_dir("bad_games");
        write_leaderboard(&dir);
        std::fs::write(dir.join(GAMES_DOC), "not json").unwrap();

        let snapshot = load_snapshot(&dir_config(&dir), &cache_config(), false)
            .await
            .unwrap();
        assert!(snapshot.games.is_none());
        assert_eq!(snapshot.warnings.len(), 1);
        assert!(snapshot.warnings[0].contains(GAMES_DOC));
    }

    #[tokio::test]
    async fn test_disabled_features_skip_documents() {
        let dir = temp_dir("features_off");
        write_leaderboard(&dir);
        std::fs::write(dir.join(VERSES_DOC), "not json").unwrap();

        let yaml = format!(
            "app:\n  name: Embaixada\nfeatures:\n  bible_verses: false\n  games: false\ndata:\n  dir: \"{}\"\n",
            dir.display()
        );
        let config: Config = serde_saphyr::from_str(&yaml).unwrap();

        let snapshot = load_snapshot(&config, &cache_config(), false).await.unwrap();
        // verses.json is malformed, but the feature is off so it is never read.
        assert!(snapshot.verses.is_none());
        assert!(snapshot.warnings.is_empty());
    }

    #[test]
    fn test_doc_url_joins_cleanly() {
        assert_eq!(
            doc_url("https://example.org/data", LEADERBOARD_DOC),
            "https://example.org/data/leaderboard.json"
        );
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for document caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    /// Entries younger than this are served without revalidation.
    pub max_age: Duration,
}

/// Get the platform-appropriate cache directory for placar
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("placar/data-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/placar/data-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the document cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// One cached document, stored through cacache keyed by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDocument {
    /// ETag from the last 200 response, for conditional revalidation.
    pub etag: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

impl CachedDocument {
    pub fn age(&self) -> Duration {
        (Utc::now() - self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Disk-persistent store for fetched JSON documents.
///
/// Reads are best effort: a miss or a corrupt entry reads as no entry at
/// all, and the caller refetches.
#[derive(Clone, Debug)]
pub struct DocumentCache {
    path: PathBuf,
}

impl DocumentCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn lookup(&self, url: &str) -> Option<CachedDocument> {
        let bytes = cacache::read_sync(&self.path, url).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn store(&self, url: &str, etag: Option<String>, body: String) -> Result<()> {
        let entry = CachedDocument {
            etag,
            fetched_at: Utc::now(),
            body,
        };
        let bytes = serde_json::to_vec(&entry).context("Failed to serialize cache entry")?;
        cacache::write_sync(&self.path, url, bytes).context("Failed to write cache entry")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache(name: &str) -> DocumentCache {
        let path = std::env::temp_dir().join(format!("placar_test_cache_{}", name));
        let _ = std::fs::remove_dir_all(&path);
        DocumentCache::new(path)
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let cache = temp_cache("miss");
        assert!(cache.lookup("https://example.org/leaderboard.json").is_none());
    }

    #[test]
    fn test_store_and_lookup_roundtrip() {
        let cache = temp_cache("roundtrip");
        let url = "https://example.org/leaderboard.json";
        cache
            .store(url, Some("\"abc123\"".to_string()), "{\"season\":\"x\"}".to_string())
            .unwrap();

        let entry = cache.lookup(url).unwrap();
        assert_eq!(entry.etag.as_deref(), Some("\"abc123\""));
        assert_eq!(entry.body, "{\"season\":\"x\"}");
        assert!(entry.age() < Duration::from_secs(60));
    }

    #[test]
    fn test_entries_are_keyed_by_url() {
        let cache = temp_cache("keys");
        cache.store("https://a.example/x.json", None, "a".to_string()).unwrap();
        cache.store("https://b.example/x.json", None, "b".to_string()).unwrap();

        assert_eq!(cache.lookup("https://a.example/x.json").unwrap().body, "a");
        assert_eq!(cache.lookup("https://b.example/x.json").unwrap().body, "b");
    }

    #[test]
    fn test_age_of_old_entry() {
        let entry = CachedDocument {
            etag: None,
            fetched_at: Utc::now() - chrono::Duration::hours(2),
            body: String::new(),
        };
        assert!(entry.age() >= Duration::from_secs(2 * 3600 - 5));
    }
}

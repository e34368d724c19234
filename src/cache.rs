//! File-backed cache for Scryfall results
//!
//! Each key is stored as its own JSON document, `<cache_dir>/<key>.json`,
//! wrapping the data with the time it was written. Documents older than the
//! configured max age are treated as missing and re-fetched by the caller.

use crate::error::Result;
use chrono::{DateTime, TimeDelta, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default freshness window for cached documents
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// On-disk envelope for a cached value
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

/// Age report for a single cache document
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub key: String,
    /// `None` when the document could not be parsed
    pub age: Option<TimeDelta>,
    pub fresh: bool,
}

/// Directory of JSON documents keyed by file stem
#[derive(Debug, Clone)]
pub struct FileCache {
    cache_dir: PathBuf,
    max_age: TimeDelta,
}

impl FileCache {
    /// Open a cache in `cache_dir`, creating the directory if needed
    pub fn new(cache_dir: impl Into<PathBuf>, max_age: TimeDelta) -> Result<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)?;
        log::debug!("Cache directory: {}", cache_dir.display());
        Ok(Self { cache_dir, max_age })
    }

    /// Default cache directory: ~/.cache/character_finder
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("character_finder")
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the full path for a cached document
    pub fn path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Freshness window of `days` days; `None` when out of range
    pub fn max_age_from_days(days: i64) -> Option<TimeDelta> {
        TimeDelta::try_days(days)
    }

    /// When an entry written at `timestamp` stops being fresh
    fn expires_at(&self, timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
        timestamp.checked_add_signed(self.max_age)
    }

    fn is_fresh(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - timestamp <= self.max_age
    }

    /// Load a cached value if present and not expired
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_at(key, Utc::now())
    }

    fn load_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let path = self.path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read cache file {}: {}", path.display(), e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to parse cache file {}, ignoring: {}", path.display(), e);
                return None;
            }
        };

        if self.is_fresh(entry.timestamp, now) {
            log::debug!("Cache hit for {}", key);
            Some(entry.data)
        } else {
            match self.expires_at(entry.timestamp) {
                Some(expiry) => log::debug!("Cache entry for {} expired at {}", key, expiry),
                None => log::debug!("Cache entry for {} expired", key),
            }
            None
        }
    }

    /// Store a value stamped with the current time
    pub fn store<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let entry = CacheEntry {
            timestamp: Utc::now(),
            data,
        };
        let content = serde_json::to_string(&entry)?;
        std::fs::write(self.path(key), content)?;
        log::debug!("Saved cache entry {}", key);
        Ok(())
    }

    /// Iterate over the keys of every document in the cache directory
    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Report the age and freshness of every cached document
    pub fn status(&self) -> Result<Vec<CacheStatus>> {
        let now = Utc::now();
        let mut statuses = Vec::new();
        for key in self.keys()? {
            let timestamp = std::fs::read_to_string(self.path(&key))
                .ok()
                .and_then(|c| serde_json::from_str::<CacheEntry<IgnoredAny>>(&c).ok())
                .map(|entry| entry.timestamp);

            statuses.push(CacheStatus {
                age: timestamp.map(|ts| now - ts),
                fresh: timestamp.is_some_and(|ts| self.is_fresh(ts, now)),
                key,
            });
        }
        Ok(statuses)
    }

    /// Delete every cached document, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let keys = self.keys()?;
        for key in &keys {
            std::fs::remove_file(self.path(key))?;
        }
        log::info!("Removed {} cache entries from {}", keys.len(), self.cache_dir.display());
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn week_cache(dir: &TempDir) -> FileCache {
        FileCache::new(dir.path(), TimeDelta::days(DEFAULT_MAX_AGE_DAYS)).unwrap()
    }

    fn write_entry(cache: &FileCache, key: &str, timestamp: DateTime<Utc>, data: serde_json::Value) {
        let entry = CacheEntry { timestamp, data };
        std::fs::write(cache.path(key), serde_json::to_string(&entry).unwrap()).unwrap();
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let cache = FileCache::new(&nested, TimeDelta::days(1)).unwrap();
        assert!(nested.is_dir());
        assert_eq!(cache.dir(), nested.as_path());
    }

    #[test]
    fn test_path_uses_key_as_file_stem() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        assert_eq!(
            cache.path("legendary_creatures"),
            temp_dir.path().join("legendary_creatures.json")
        );
    }

    #[test]
    fn test_store_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);

        assert!(cache.load::<Vec<String>>("planeswalker_names").is_none());

        let names = vec!["Jace Beleren".to_string(), "Liliana Vess".to_string()];
        cache.store("planeswalker_names", &names).unwrap();

        let loaded: Vec<String> = cache.load("planeswalker_names").unwrap();
        assert_eq!(loaded, names);
    }

    #[test]
    fn test_document_layout() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        cache.store("references_teferi", &vec!["Teferi's Protection"]).unwrap();

        let raw = std::fs::read_to_string(cache.path("references_teferi")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["timestamp"].is_string());
        assert_eq!(value["data"][0], "Teferi's Protection");
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        write_entry(
            &cache,
            "legendary_creatures",
            Utc::now() - TimeDelta::days(8),
            serde_json::json!(["old"]),
        );

        assert!(cache.load::<Vec<String>>("legendary_creatures").is_none());
    }

    #[test]
    fn test_entry_at_max_age_is_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        let now = Utc::now();
        write_entry(&cache, "edge", now - TimeDelta::days(7), serde_json::json!(1));

        assert_eq!(cache.load_at::<u32>("edge", now), Some(1));
        assert_eq!(cache.load_at::<u32>("edge", now + TimeDelta::seconds(1)), None);
    }

    #[test]
    fn test_max_age_from_days_rejects_out_of_range() {
        assert_eq!(FileCache::max_age_from_days(7), Some(TimeDelta::days(7)));
        assert!(FileCache::max_age_from_days(200_000_000_000).is_none());
        assert!(FileCache::max_age_from_days(-200_000_000_000).is_none());
    }

    #[test]
    fn test_expiry_overflow_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let max_age = FileCache::max_age_from_days(-100_000_000).unwrap();
        let cache = FileCache::new(temp_dir.path(), max_age).unwrap();
        let now = Utc::now();
        write_entry(&cache, "edge", now, serde_json::json!(1));

        assert!(cache.expires_at(now).is_none());
        assert_eq!(cache.load_at::<u32>("edge", now), None);
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        std::fs::write(cache.path("broken"), "{ not json").unwrap();

        assert!(cache.load::<Vec<String>>("broken").is_none());
    }

    #[test]
    fn test_wrong_shape_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        cache.store("shape", &42u32).unwrap();

        assert!(cache.load::<Vec<String>>("shape").is_none());
    }

    #[test]
    fn test_status_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let cache = week_cache(&temp_dir);
        cache.store("fresh", &1u32).unwrap();
        write_entry(&cache, "stale", Utc::now() - TimeDelta::days(30), serde_json::json!(2));
        std::fs::write(cache.path("broken"), "garbage").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "not a cache file").unwrap();

        let statuses = cache.status().unwrap();
        let keys: Vec<&str> = statuses.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["broken", "fresh", "stale"]);
        assert!(statuses[0].age.is_none() && !statuses[0].fresh);
        assert!(statuses[1].fresh);
        assert!(!statuses[2].fresh);
        assert!(statuses[2].age.unwrap() >= TimeDelta::days(30));

        assert_eq!(cache.clear().unwrap(), 3);
        assert!(cache.status().unwrap().is_empty());
        assert!(temp_dir.path().join("notes.txt").exists());
    }
}

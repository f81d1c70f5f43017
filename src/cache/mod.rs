//! Two-tier TTL cache for scraped content.
//!
//! ```text
//! get: memory tier → persisted tier (promote on hit) → miss
//! set: memory tier + read-merge-write of the persisted table
//! ```
//!
//! Entries are never evicted one by one. A stale entry is a miss and is
//! replaced by the next successful `set` for that key. Persisted-tier
//! failures are logged and swallowed; the memory tier stays authoritative for
//! the process lifetime.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CacheConfig;

/// Errors from the persisted tier. Never returned from [`ContentCache::get`]
/// or [`ContentCache::set`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cache file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache lock poisoned: {0}")]
    Poisoned(String),
}

/// Source of the current time, injectable so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One cached payload. Serialized as `{"timestamp": <epoch ms>, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

pub struct ContentCache {
    path: PathBuf,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    memory: Mutex<HashMap<String, CacheEntry>>,
    // Serializes read-modify-write cycles on the persisted table.
    disk: Mutex<()>,
}

impl ContentCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self::with_clock(path, ttl, Arc::new(SystemClock))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.resolved_path(), config.ttl())
    }

    pub fn with_clock(path: impl Into<PathBuf>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            memory: Mutex::new(HashMap::new()),
            disk: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop every entry from both tiers.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.memory()?.clear();

        let _guard = self
            .disk
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Look up a fresh entry for `key`, checking memory before disk.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now();

        if let Some(data) = self.memory_lookup(key, now) {
            return decode(key, data);
        }

        let table = match self.read_table() {
            Ok(table) => table,
            Err(e) => {
                warn!("Cache read error: {}", e);
                return None;
            }
        };

        let entry = table
            .get(key)
            .and_then(|raw| serde_json::from_value::<CacheEntry>(raw.clone()).ok())
            .filter(|entry| self.is_fresh(entry, now))?;

        debug!("Cache hit on disk for {}", key);
        let data = entry.data.clone();
        if let Ok(mut memory) = self.memory() {
            memory.insert(key.to_string(), entry);
        }
        decode(key, data)
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                warn!("Cache entry for {} is not serializable: {}", key, e);
                return;
            }
        };

        let entry = CacheEntry {
            timestamp: self.clock.now(),
            data,
        };

        match self.memory() {
            Ok(mut memory) => {
                memory.insert(key.to_string(), entry.clone());
            }
            Err(e) => warn!("Cache memory tier unavailable: {}", e),
        }

        if let Err(e) = self.persist(key, entry) {
            warn!("Cache write error: {}", e);
        }
    }

    fn memory(&self) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, CacheError> {
        self.memory
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))
    }

    fn memory_lookup(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let memory = self.memory().ok()?;
        memory
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.data.clone())
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.timestamp) < self.ttl
    }

    fn read_table(&self) -> Result<Map<String, Value>, CacheError> {
        let _guard = self
            .disk
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        self.load_table()
    }

    /// Read the whole persisted table. A missing file is an empty table.
    fn load_table(&self) -> Result<Map<String, Value>, CacheError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(table) => Ok(table),
            _ => Ok(Map::new()),
        }
    }

    fn persist(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let _guard = self
            .disk
            .lock()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;

        // A corrupt table is replaced rather than blocking all future writes.
        let mut table = self.load_table().unwrap_or_else(|e| {
            warn!("Discarding unreadable cache file: {}", e);
            Map::new()
        });
        table.insert(key.to_string(), serde_json::to_value(entry)?);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let encoded = serde_json::to_string(&table)?;
        fs::write(&self.path, encoded).map_err(|e| CacheError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn decode<T: DeserializeOwned>(key: &str, data: Value) -> Option<T> {
    match serde_json::from_value(data) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Cached payload for {} has an unexpected shape: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to.
    pub(crate) struct ManualClock {
        millis: AtomicI64,
    }

    impl ManualClock {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                millis: AtomicI64::new(Utc::now().timestamp_millis()),
            })
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.millis
                .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
                .unwrap_or_else(Utc::now)
        }
    }

    const TTL: Duration = Duration::from_secs(12 * 60 * 60);

    fn cache_in(dir: &Path, clock: Arc<ManualClock>) -> ContentCache {
        ContentCache::with_clock(dir.join("content_cache.json"), TTL, clock)
    }

    #[test]
    fn test_get_after_set_returns_value() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), ManualClock::new());

        cache.set("trending_mixed", &vec!["a", "b"]);
        let got: Option<Vec<String>> = cache.get("trending_mixed");
        assert_eq!(got, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), ManualClock::new());
        assert_eq!(cache.get::<String>("nope"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let cache = cache_in(dir.path(), clock.clone());

        cache.set("details-tt0111161", &"plot");
        clock.advance(TTL - Duration::from_secs(1));
        assert_eq!(cache.get::<String>("details-tt0111161").as_deref(), Some("plot"));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get::<String>("details-tt0111161"), None);
    }

    #[test]
    fn test_survives_restart_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();

        cache_in(dir.path(), clock.clone()).set("latest_mixed", &42u32);

        clock.advance(Duration::from_secs(60 * 60));
        let restarted = cache_in(dir.path(), clock.clone());
        assert_eq!(restarted.get::<u32>("latest_mixed"), Some(42));

        // Promoted into memory: still served after the file disappears
        fs::remove_file(restarted.path()).unwrap();
        assert_eq!(restarted.get::<u32>("latest_mixed"), Some(42));
    }

    #[test]
    fn test_stale_disk_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();

        cache_in(dir.path(), clock.clone()).set("latest_mixed", &1u32);
        clock.advance(TTL);

        let restarted = cache_in(dir.path(), clock);
        assert_eq!(restarted.get::<u32>("latest_mixed"), None);
    }

    #[test]
    fn test_sets_merge_into_one_table() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let cache = cache_in(dir.path(), clock.clone());

        cache.set("a", &1u32);
        cache.set("b", &2u32);

        let raw = fs::read_to_string(cache.path()).unwrap();
        let table: Map<String, Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["a"]["data"], 1);
        assert!(table["b"]["timestamp"].is_i64());
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let cache = cache_in(dir.path(), clock.clone());
        fs::write(cache.path(), "{not json").unwrap();

        assert_eq!(cache.get::<u32>("a"), None);

        cache.set("a", &7u32);
        let restarted = cache_in(dir.path(), clock);
        assert_eq!(restarted.get::<u32>("a"), Some(7));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let cache = cache_in(dir.path(), clock.clone());
        let now = clock.now().timestamp_millis();
        fs::write(
            cache.path(),
            format!(
                r#"{{"junk": 5, "ok": {{"timestamp": {now}, "data": "x", "extra": true}}}}"#
            ),
        )
        .unwrap();

        assert_eq!(cache.get::<String>("ok").as_deref(), Some("x"));
        assert_eq!(cache.get::<String>("junk"), None);
    }

    #[test]
    fn test_unwritable_path_keeps_memory_tier() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail
        let path = dir.path().join("blocked");
        fs::create_dir(&path).unwrap();
        let cache = ContentCache::with_clock(&path, TTL, ManualClock::new());

        cache.set("k", &"v");
        assert_eq!(cache.get::<String>("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_clear_empties_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path(), ManualClock::new());

        cache.set("genre-horror", &3u32);
        cache.clear().unwrap();

        assert!(!cache.path().exists());
        assert_eq!(cache.get::<u32>("genre-horror"), None);
        // Clearing an already empty cache is fine
        cache.clear().unwrap();
    }

    #[test]
    fn test_concurrent_sets_keep_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let cache = Arc::new(cache_in(dir.path(), clock.clone()));

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.set(&format!("k{i}"), &i))
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let restarted = cache_in(dir.path(), clock);
        for i in 0..16u32 {
            assert_eq!(restarted.get::<u32>(&format!("k{i}")), Some(i), "lost k{i}");
        }
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the content cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Location of the persisted tier (default: `<data_dir>/marquee/content_cache.json`)
    pub path: Option<PathBuf>,

    /// Entry lifetime in hours (default: 12)
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            ttl_hours: 12,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 60 * 60)
    }

    /// Resolve the persisted tier location, falling back to the temp dir
    /// when no data directory is known for this platform.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(ref path) = self.path {
            return path.clone();
        }
        match dirs::data_dir() {
            Some(dir) => dir.join("marquee").join("content_cache.json"),
            None => std::env::temp_dir().join("marquee_cache.json"),
        }
    }
}

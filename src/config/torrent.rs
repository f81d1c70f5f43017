use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the torrent index client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TorrentConfig {
    /// JSON search endpoint of the torrent index
    pub endpoint: String,

    /// Index category for video content (default: "200")
    pub category: String,

    /// Maximum results kept per search (default: 20)
    pub limit: usize,

    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for TorrentConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://apibay.org/q.php".to_string(),
            category: "200".to_string(),
            limit: 20,
            timeout_secs: 10,
        }
    }
}

impl TorrentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

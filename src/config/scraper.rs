use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the shared browsing session and the job queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// User agent string sent with every navigation
    pub user_agent: String,

    /// Seconds after which a running job is reported as stuck (default: 25)
    pub job_timeout_secs: u64,

    /// Pause between two jobs in milliseconds (default: 500)
    pub cooldown_ms: u64,

    /// Wait after navigating to a client-rendered page in milliseconds (default: 2500)
    pub settle_delay_ms: u64,

    /// Hosts whose pages need the settle delay before extraction
    pub settle_domains: Vec<String>,

    /// Browser window width (default: 1024)
    pub window_width: u32,

    /// Browser window height (default: 768)
    pub window_height: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            job_timeout_secs: 25,
            cooldown_ms: 500,
            settle_delay_ms: 2500,
            settle_domains: vec!["youtube.com".to_string()],
            window_width: 1024,
            window_height: 768,
        }
    }
}

impl ScraperConfig {
    /// Get the stuck-job reporting threshold as a Duration
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    /// Get the inter-job cool-down as a Duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Get the settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Whether a page on `host` needs the settle delay
    pub fn needs_settle(&self, host: &str) -> bool {
        self.settle_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }
}

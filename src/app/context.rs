use std::sync::Arc;

use tracing::info;

use crate::app::error::Result;
use crate::cache::ContentCache;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::queue::spawn_scrape_queue;
use crate::session::ChromeLauncher;
use crate::torrent::{ApibayClient, TorrentSearch};

pub struct AppContext {
    pub config: Config,
    pub cache: Arc<ContentCache>,
    pub catalog: Catalog,
}

impl AppContext {
    /// Wire the cache, scrape queue and torrent client together.
    ///
    /// Must be called from within a tokio runtime: the queue worker is
    /// spawned immediately, the browser itself only on the first job.
    pub fn new(config: Config) -> Result<Self> {
        let cache = Arc::new(ContentCache::from_config(&config.cache));
        info!("Using content cache at {}", cache.path().display());

        let queue = spawn_scrape_queue(ChromeLauncher, config.scraper.clone());
        let torrents: Arc<dyn TorrentSearch> = Arc::new(ApibayClient::new(&config.torrent)?);
        let catalog = Catalog::new(queue, cache.clone(), torrents, config.torrent.clone());

        Ok(Self {
            config,
            cache,
            catalog,
        })
    }
}

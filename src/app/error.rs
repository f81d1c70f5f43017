use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::queue::ScrapeError;
use crate::torrent::TorrentError;

#[derive(Error, Debug)]
pub enum MarqueeError {
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Torrent search error: {0}")]
    Torrent(#[from] TorrentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MarqueeError>;

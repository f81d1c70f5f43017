//! Torrent search and release ranking.
//!
//! ```text
//! TorrentSearch::search → Vec<SearchHit> → rank_*_releases → Vec<Release>
//! ```
//!
//! Ranking is pure and deterministic; only the search client does I/O.

pub mod apibay;
mod filter;

pub use apibay::ApibayClient;
pub use filter::{is_bad_quality, rank_episode_releases, rank_movie_releases};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TorrentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Malformed search response: {0}")]
    Malformed(String),
}

/// One raw result from a torrent index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub size: String,
    pub magnet: Option<String>,
    pub seeds: u32,
}

#[async_trait]
pub trait TorrentSearch: Send + Sync {
    /// Search `category` for `query`, returning at most `limit` hits
    async fn search(
        &self,
        query: &str,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, TorrentError>;
}

/// `"<title> <year>"`
pub fn movie_query(title: &str, year: u16) -> String {
    format!("{} {}", title, year)
}

/// `"<title> S01E02"`
pub fn episode_query(title: &str, season: u32, episode: u32) -> String {
    format!("{} S{:02}E{:02}", title, season, episode)
}

//! Cache-checked, queue-backed lookups consumed by the UI layer.
//!
//! Every call returns a well-formed value: scrape and search failures are
//! logged and turned into an empty list or `None`.

mod sources;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use url::Url;

use crate::app::Result;
use crate::cache::ContentCache;
use crate::config::TorrentConfig;
use crate::domain::{select_trailer, Release, TitleDetails, TitleSummary};
use crate::queue::ScrapeQueueHandle;
use crate::scripts::{Extracted, Script};
use crate::torrent::{
    episode_query, movie_query, rank_episode_releases, rank_movie_releases, SearchHit,
    TorrentSearch,
};

pub use sources::Listing;

pub struct Catalog {
    queue: ScrapeQueueHandle,
    cache: Arc<ContentCache>,
    torrents: Arc<dyn TorrentSearch>,
    torrent_config: TorrentConfig,
    // Trailer ids per "title-year", kept for the process lifetime
    trailers: Mutex<HashMap<String, String>>,
}

impl Catalog {
    pub fn new(
        queue: ScrapeQueueHandle,
        cache: Arc<ContentCache>,
        torrents: Arc<dyn TorrentSearch>,
        torrent_config: TorrentConfig,
    ) -> Self {
        Self {
            queue,
            cache,
            torrents,
            torrent_config,
            trailers: Mutex::new(HashMap::new()),
        }
    }

    /// Most popular movies and series right now
    pub async fn trending(&self) -> Vec<TitleSummary> {
        self.listing(Listing::Trending).await
    }

    /// Newest releases
    pub async fn latest(&self) -> Vec<TitleSummary> {
        self.listing(Listing::Latest).await
    }

    /// The `n` most popular titles this week
    pub async fn top(&self, n: usize) -> Vec<TitleSummary> {
        self.listing(Listing::Top(n)).await
    }

    /// Best rated feature films of a genre
    pub async fn by_genre(&self, genre: &str) -> Vec<TitleSummary> {
        self.listing(Listing::Genre(genre.to_lowercase())).await
    }

    /// Free-text title search
    pub async fn search(&self, query: &str) -> Vec<TitleSummary> {
        self.listing(Listing::Search(query.trim().to_string())).await
    }

    pub async fn listing(&self, listing: Listing) -> Vec<TitleSummary> {
        let key = listing.cache_key();
        if let Some(titles) = self.cache.get::<Vec<TitleSummary>>(&key) {
            info!("[Cache] Serving {} from cache", key);
            return titles;
        }

        let mut titles = match self.scrape(&listing.url(), Script::TitleList).await {
            Ok(Extracted::Titles(titles)) => titles,
            Ok(other) => {
                warn!("Unexpected extraction for {}: {}", key, other.summary());
                Vec::new()
            }
            Err(e) => {
                error!("Failed to load {}: {}", key, e);
                Vec::new()
            }
        };

        if let Some(limit) = listing.limit() {
            titles.truncate(limit);
        }
        if !titles.is_empty() {
            self.cache.set(&key, &titles);
        }
        titles
    }

    /// Video id of the best trailer for a title, if any was found
    pub async fn trailer(&self, title: &str, year: u16) -> Option<String> {
        let memo_key = format!("{}-{}", title, year);
        if let Some(id) = self.memoized_trailer(&memo_key) {
            return Some(id);
        }

        let candidates = match self
            .scrape(&sources::trailer_search_url(title, year), Script::TrailerCandidates)
            .await
        {
            Ok(Extracted::Trailers(candidates)) => candidates,
            Ok(other) => {
                warn!("Unexpected extraction for trailer search: {}", other.summary());
                return None;
            }
            Err(e) => {
                error!("Trailer search for {} failed: {}", memo_key, e);
                return None;
            }
        };

        let chosen = select_trailer(&candidates)?;
        info!(
            "Selected trailer {} from channel {}",
            chosen.video_id, chosen.channel_name
        );
        if let Ok(mut trailers) = self.trailers.lock() {
            trailers.insert(memo_key, chosen.video_id.clone());
        }
        Some(chosen.video_id.clone())
    }

    fn memoized_trailer(&self, key: &str) -> Option<String> {
        self.trailers.lock().ok()?.get(key).cloned()
    }

    /// Detail-page fields for a title id such as `tt0111161`.
    ///
    /// A record with every field empty is returned but not cached, so a
    /// challenge or error page is retried on the next call.
    pub async fn details(&self, id: &str) -> Option<TitleDetails> {
        let key = format!("details-{}", id);
        if let Some(details) = self.cache.get::<TitleDetails>(&key) {
            info!("[Cache] Serving {} from cache", key);
            return Some(details);
        }

        match self.scrape(&sources::details_url(id), Script::TitleDetails).await {
            Ok(Extracted::Details(details)) => {
                if details == TitleDetails::default() {
                    warn!("No detail fields found for {}", id);
                } else {
                    self.cache.set(&key, &details);
                }
                Some(details)
            }
            Ok(other) => {
                warn!("Unexpected extraction for {}: {}", key, other.summary());
                None
            }
            Err(e) => {
                error!("Failed to load {}: {}", key, e);
                None
            }
        }
    }

    /// Ranked releases of a movie, bad-quality copies removed
    pub async fn torrents_for_title(&self, title: &str, year: u16) -> Vec<Release> {
        rank_movie_releases(self.search_torrents(&movie_query(title, year)).await)
    }

    /// Ranked releases of one episode
    pub async fn episode_torrents(&self, title: &str, season: u32, episode: u32) -> Vec<Release> {
        rank_episode_releases(
            self.search_torrents(&episode_query(title, season, episode))
                .await,
        )
    }

    /// Magnet link of the best ranked movie release
    pub async fn best_magnet(&self, title: &str, year: u16) -> Option<String> {
        self.torrents_for_title(title, year)
            .await
            .into_iter()
            .next()
            .and_then(|release| release.magnet)
    }

    async fn search_torrents(&self, query: &str) -> Vec<SearchHit> {
        info!("Searching for: {}", query);
        match self
            .torrents
            .search(query, &self.torrent_config.category, self.torrent_config.limit)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                error!("Torrent search error: {}", e);
                Vec::new()
            }
        }
    }

    async fn scrape(&self, url: &str, script: Script) -> Result<Extracted> {
        let url = Url::parse(url)?;
        Ok(self.queue.enqueue(url, script).await?)
    }
}

//! # Marquee
//!
//! Scrape-driven movie and series catalog with a persistent content cache.
//!
//! ## Architecture
//!
//! Every page lookup flows through one pipeline:
//!
//! ```text
//! Catalog → ContentCache ─miss─▶ ScrapeQueue → SessionManager → Script
//!                 ▲                                               │
//!                 └──────────── non-empty result ◀────────────────┘
//! ```
//!
//! - [`catalog`]: cache-checked listings, trailers, details and torrents
//! - [`cache`]: two-tier TTL cache persisted as one JSON table
//! - [`queue`]: strictly sequential job queue over a single browser
//! - [`session`]: lazily launched, self-healing browser session
//! - [`scripts`]: extraction routines run against captured page DOMs
//!
//! ## Quick Start
//!
//! ```bash
//! # Trending titles as JSON
//! marquee trending
//!
//! # Best trailer for a title
//! marquee trailer "Dune Part Two" 2024
//!
//! # Most seeded usable release
//! marquee torrents "Dune Part Two" 2024 --best
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Titles, trailers and releases
//! - [`torrent`]: Torrent index search and release ranking

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// cache, scrape queue, torrent client, catalog.
pub mod app;

/// Two-tier TTL content cache.
///
/// - [`ContentCache`](cache::ContentCache): memory map backed by a JSON file
/// - [`Clock`](cache::Clock): time source, swapped out in tests
pub mod cache;

/// Domain extractors consumed by the UI layer.
pub mod catalog;

/// Command-line interface using clap.
///
/// - `trending`, `latest`, `top [-n N]`, `genre <g>`, `search <q>`
/// - `trailer <title> <year>`, `details <id>`
/// - `torrents <title> <year> [--best]`, `episode <title> <season> <episode>`
/// - `clear-cache`
pub mod cli;

/// Configuration loaded from `~/.config/marquee/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`TitleSummary`](domain::TitleSummary): one entry of a listing
/// - [`TitleDetails`](domain::TitleDetails): detail page fields
/// - [`TrailerCandidate`](domain::TrailerCandidate): video search result
/// - [`Release`](domain::Release): ranked torrent release
pub mod domain;

/// Single-worker scrape queue.
///
/// - [`ScrapeQueueHandle`](queue::ScrapeQueueHandle): enqueue jobs, await results
/// - [`spawn_scrape_queue`](queue::spawn_scrape_queue): start the worker task
pub mod queue;

/// Closed set of page extraction routines.
pub mod scripts;

/// Browser session management.
///
/// Uses headless Chrome via chromiumoxide.
///
/// - [`Session`](session::Session): one open page
/// - [`SessionLauncher`](session::SessionLauncher): creates sessions
/// - [`ChromeLauncher`](session::ChromeLauncher): Chromium implementation
pub mod session;

/// Torrent search and quality filtering.
pub mod torrent;

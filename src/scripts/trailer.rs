use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::debug;

use crate::domain::trailer::{is_blocked_channel, is_rejected_title};
use crate::domain::TrailerCandidate;
use crate::scripts::{first_text, selector, text_of, ExtractionError};

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"v=([^&]+)").unwrap());

/// Collect trailer candidates from a rendered video-search results page.
///
/// Concept/fan-made titles and blocklisted channels are dropped here; the
/// choice between the survivors is left to [`crate::domain::select_trailer`].
pub fn extract_candidates(document: &Html) -> Result<Vec<TrailerCandidate>, ExtractionError> {
    let renderer_sel = selector("ytd-video-renderer")?;
    let link_sel = selector("a#video-title")?;
    let channel_sels = [
        selector("#channel-info #text-container")?,
        selector(".ytd-channel-name a")?,
        selector(".ytd-channel-name")?,
    ];

    let mut candidates = Vec::new();

    for renderer in document.select(&renderer_sel) {
        let Some(link) = renderer.select(&link_sel).next() else {
            continue;
        };

        let title = link
            .value()
            .attr("title")
            .map(str::to_string)
            .unwrap_or_else(|| text_of(link));
        if is_rejected_title(&title) {
            continue;
        }

        let channel = channel_sels
            .iter()
            .find_map(|sel| first_text(renderer, sel))
            .unwrap_or_default();
        if is_blocked_channel(&channel) {
            debug!("Skipping blocked channel: {}", channel);
            continue;
        }

        let video_id = link
            .value()
            .attr("href")
            .filter(|href| href.contains("/watch?v="))
            .and_then(|href| VIDEO_ID.captures(href))
            .map(|c| c[1].to_string());

        if let Some(video_id) = video_id {
            candidates.push(TrailerCandidate::new(video_id, &channel));
        }
    }

    Ok(candidates)
}

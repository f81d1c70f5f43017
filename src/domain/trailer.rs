use serde::{Deserialize, Serialize};

/// A video-search result that survived the title filter, pending selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerCandidate {
    pub video_id: String,
    /// Lowercased channel name
    pub channel_name: String,
}

impl TrailerCandidate {
    pub fn new(video_id: impl Into<String>, channel_name: &str) -> Self {
        Self {
            video_id: video_id.into(),
            channel_name: channel_name.trim().to_lowercase(),
        }
    }
}

/// Channels known for concept or fan-made trailers (lowercase)
pub const CHANNEL_BLOCKLIST: &[&str] = &[
    "screen culture",
    "teaser pro",
    "kh studio",
    "foxstar media",
    "darth trailer",
    "concept trailer",
    "fan made",
    "stryder hd",
    "rob long",
    "sluurp",
];

/// Studio and platform channels preferred over anything else (lowercase)
pub const OFFICIAL_CHANNELS: &[&str] = &[
    "walt disney",
    "warner bros",
    "universal pictures",
    "sony pictures",
    "paramount pictures",
    "studiocanal",
    "toho",
    "cj entertainment",
    "yash raj films",
    "dharma productions",
    "a24",
    "lionsgate",
    "neon",
    "netflix",
    "prime video",
    "hbo max",
    "apple tv",
    "disney",
    "hulu",
    "amazon prime",
    "ign",
];

/// Whether a video title marks it as concept or fan-made
pub fn is_rejected_title(title: &str) -> bool {
    let title = title.to_lowercase();
    title.contains("concept") || title.contains("fan made") || title.contains("fan-made")
}

/// Whether a channel name hits the blocklist (case-insensitive)
pub fn is_blocked_channel(channel: &str) -> bool {
    let channel = channel.to_lowercase();
    CHANNEL_BLOCKLIST.iter().any(|bad| channel.contains(bad))
}

impl TrailerCandidate {
    pub fn is_official(&self) -> bool {
        OFFICIAL_CHANNELS
            .iter()
            .any(|official| self.channel_name.contains(official))
    }

    pub fn is_blocked(&self) -> bool {
        is_blocked_channel(&self.channel_name)
    }
}

/// Pick the trailer to play from candidates in page order.
///
/// Blocked channels never win. The first official channel wins over page
/// order; otherwise the first remaining candidate does.
pub fn select_trailer(candidates: &[TrailerCandidate]) -> Option<&TrailerCandidate> {
    let mut allowed = candidates.iter().filter(|c| !c.is_blocked());
    let first = allowed.next()?;
    if first.is_official() {
        return Some(first);
    }
    allowed.find(|c| c.is_official()).or(Some(first))
}

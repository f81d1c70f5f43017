use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{Quality, Release};
use crate::torrent::SearchHit;

/// Substrings marking camcorder, telesync, screener or workprint releases
const BAD_KEYWORDS: &[&str] = &[
    "cam",
    "hdcam",
    "camrip",
    "telesync",
    "ts",
    "hdts",
    "hardcoded",
    "hc",
    "screener",
    "scr",
    "dvdscr",
    "dvdscreener",
    "korsub",
    "hcsub",
    "workprint",
    "wp",
];

static WORD_TS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bts\b").unwrap());
static WORD_CAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bcam\b").unwrap());

/// Whether a release name looks like a pre-release or camcorder copy.
///
/// `ts` and `cam` only count as whole words or in `hdts`/`hdcam`/`webcam`.
pub fn is_bad_quality(name: &str) -> bool {
    let name = name.to_lowercase();
    BAD_KEYWORDS.iter().any(|keyword| {
        if !name.contains(keyword) {
            return false;
        }
        match *keyword {
            "ts" => WORD_TS.is_match(&name) || name.contains("hdts"),
            "cam" => {
                WORD_CAM.is_match(&name) || name.contains("hdcam") || name.contains("webcam")
            }
            _ => true,
        }
    })
}

fn to_release(hit: SearchHit) -> Release {
    Release {
        quality: Quality::from_name(&hit.title),
        title: hit.title,
        size: hit.size,
        magnet: hit.magnet,
        seeds: hit.seeds,
    }
}

fn by_seeds_desc(releases: &mut [Release]) {
    releases.sort_by(|a, b| b.seeds.cmp(&a.seeds));
}

/// Releases for a movie: magnet required, bad quality dropped, most seeded first
pub fn rank_movie_releases(hits: Vec<SearchHit>) -> Vec<Release> {
    let mut releases: Vec<Release> = hits
        .into_iter()
        .filter(|hit| hit.magnet.is_some())
        .filter(|hit| {
            let bad = is_bad_quality(&hit.title);
            if bad {
                debug!("Dropped partial/CAM torrent: {}", hit.title);
            }
            !bad
        })
        .map(to_release)
        .collect();
    by_seeds_desc(&mut releases);
    releases
}

/// Releases for an episode: magnet required, most seeded first
pub fn rank_episode_releases(hits: Vec<SearchHit>) -> Vec<Release> {
    let mut releases: Vec<Release> = hits
        .into_iter()
        .filter(|hit| hit.magnet.is_some())
        .map(to_release)
        .collect();
    by_seeds_desc(&mut releases);
    releases
}

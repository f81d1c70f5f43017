use std::fmt;

use serde::{Deserialize, Serialize};

/// Video quality guessed from a release name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "4K")]
    Uhd,
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "480p")]
    Sd,
    #[serde(rename = "CAM")]
    Cam,
    Unknown,
}

impl Quality {
    /// Match the name against the quality ladder, best tier first
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("2160p") || name.contains("4k") {
            Quality::Uhd
        } else if name.contains("1080p") {
            Quality::FullHd
        } else if name.contains("720p") {
            Quality::Hd
        } else if name.contains("480p") {
            Quality::Sd
        } else if name.contains("cam") {
            Quality::Cam
        } else {
            Quality::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Uhd => "4K",
            Quality::FullHd => "1080p",
            Quality::Hd => "720p",
            Quality::Sd => "480p",
            Quality::Cam => "CAM",
            Quality::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One downloadable item found by a torrent search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub title: String,
    /// Human-readable size as reported by the index
    pub size: String,
    pub magnet: Option<String>,
    pub seeds: u32,
    pub quality: Quality,
}

use serde::{Deserialize, Serialize};

/// Rating shown when a listing carries no usable score
pub const NO_RATING: &str = "N/A";

/// One entry of a scraped title listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSummary {
    /// Canonical content identifier, e.g. `tt0111161`
    pub id: String,
    pub title: String,
    /// Poster URL, empty when the listing has none
    pub image: String,
    /// Release year, 0 when unknown
    pub year: u16,
    /// Rating as displayed (`"8.4"`), or [`NO_RATING`]
    pub rating: String,
    pub vote_count: u64,
}

/// Structured fields read from a title's detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleDetails {
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub runtime: Option<String>,
    /// Certification such as `PG-13` or `TV-MA`
    pub mpaa: Option<String>,
}

//! Page addresses and cache keys for every catalog lookup.

use url::form_urlencoded;

const TITLE_SEARCH: &str = "https://www.imdb.com/search/title/";

/// A ranked or searched title listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Trending,
    Latest,
    Top(usize),
    /// Lowercase genre name
    Genre(String),
    Search(String),
}

impl Listing {
    pub fn cache_key(&self) -> String {
        match self {
            Listing::Trending => "trending_mixed".to_string(),
            Listing::Latest => "latest_mixed".to_string(),
            Listing::Top(n) => format!("top_{}_mixed", n),
            Listing::Genre(genre) => format!("genre-{}", genre),
            Listing::Search(query) => format!("search-{}", query),
        }
    }

    pub fn url(&self) -> String {
        match self {
            Listing::Trending => format!(
                "{}?title_type=feature,tv_series,tv_miniseries&sort=moviemeter,asc&num_votes=15000,",
                TITLE_SEARCH
            ),
            Listing::Latest => format!(
                "{}?title_type=feature,tv_series,tv_miniseries&release_date=2024-01-01,&sort=release_date,desc&num_votes=500,",
                TITLE_SEARCH
            ),
            Listing::Top(_) => format!(
                "{}?title_type=feature,tv_series,tv_miniseries&sort=moviemeter,asc&num_votes=1000,",
                TITLE_SEARCH
            ),
            Listing::Genre(genre) => format!(
                "{}?genres={}&sort=user_rating,desc&title_type=feature&num_votes=25000,",
                TITLE_SEARCH,
                encode(genre)
            ),
            Listing::Search(query) => format!(
                "https://www.imdb.com/find/?q={}&s=tt&ttype=ft&ref_=fn_ft",
                encode(query)
            ),
        }
    }

    /// Maximum number of titles kept from the page
    pub fn limit(&self) -> Option<usize> {
        match self {
            Listing::Top(n) => Some(*n),
            _ => None,
        }
    }
}

pub(crate) fn trailer_search_url(title: &str, year: u16) -> String {
    let query = format!("{} {} official trailer -concept -fan", title, year);
    // sp= restricts results to videos
    format!(
        "https://www.youtube.com/results?search_query={}&sp=EgIQAQ%253D%253D",
        encode(&query)
    )
}

pub(crate) fn details_url(id: &str) -> String {
    format!("https://www.imdb.com/title/{}/", encode(id))
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

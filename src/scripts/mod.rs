//! Extraction routines run against a loaded page.
//!
//! Each [`Script`] is a pure function from the page's serialized DOM to typed
//! data. The set is closed: callers pick a variant, they never inject code.
//!
//! ```text
//! Session::content() → Html → Script::run → Extracted
//! ```

mod details;
mod title_list;
mod trailer;

pub use details::extract_details;
pub use title_list::{extract_titles, parse_vote_count, upgrade_image};
pub use trailer::extract_candidates;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::domain::{TitleDetails, TitleSummary, TrailerCandidate};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// The closed set of extraction routines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Ranked/search title listings
    TitleList,
    /// Video-search results filtered into trailer candidates
    TrailerCandidates,
    /// Plot, genres, cast and metadata line of one title
    TitleDetails,
}

/// Output of a [`Script`]
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Titles(Vec<TitleSummary>),
    Trailers(Vec<TrailerCandidate>),
    Details(TitleDetails),
}

impl Extracted {
    /// Short description for logging
    pub fn summary(&self) -> String {
        match self {
            Extracted::Titles(titles) => match titles.first() {
                Some(first) => format!("{} titles, first: {}", titles.len(), first.title),
                None => "0 titles".to_string(),
            },
            Extracted::Trailers(candidates) => format!("{} trailer candidates", candidates.len()),
            Extracted::Details(details) => {
                format!("details with {} cast members", details.cast.len())
            }
        }
    }
}

impl Script {
    pub fn name(&self) -> &'static str {
        match self {
            Script::TitleList => "title-list",
            Script::TrailerCandidates => "trailer-candidates",
            Script::TitleDetails => "title-details",
        }
    }

    /// Parse `html` and run the routine against it
    pub fn run(&self, html: &str) -> Result<Extracted, ExtractionError> {
        let document = Html::parse_document(html);
        match self {
            Script::TitleList => extract_titles(&document).map(Extracted::Titles),
            Script::TrailerCandidates => extract_candidates(&document).map(Extracted::Trailers),
            Script::TitleDetails => extract_details(&document).map(Extracted::Details),
        }
    }

    /// In-page JavaScript to run before the DOM is captured, if any.
    ///
    /// The video-search page may be covered by a consent dialog; this clicks
    /// through it and waits for the results to render.
    pub fn prelude(&self) -> Option<&'static str> {
        match self {
            Script::TrailerCandidates => Some(CONSENT_PRELUDE),
            _ => None,
        }
    }
}

const CONSENT_PRELUDE: &str = r#"
(async () => {
    const wait = (ms) => new Promise(resolve => setTimeout(resolve, ms));
    const accept = Array.from(document.querySelectorAll('button')).find(b => {
        const text = (b.textContent || '').toLowerCase();
        return text.includes('accept all') || text.includes('i agree') || text.includes('reject all');
    });
    if (accept) { accept.click(); await wait(800); }
    if (document.querySelectorAll('ytd-video-renderer').length === 0) { await wait(1000); }
    return true;
})()
"#;

pub(crate) fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Trimmed text content of an element
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match of `sel` under `scope`, if non-empty
pub(crate) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty())
}

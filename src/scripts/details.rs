use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::domain::TitleDetails;
use crate::scripts::{selector, text_of, ExtractionError};

static RUNTIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+h(\s*\d+m)?$|^\d+m$").unwrap());
// US ratings only; regional certificates such as `12A` or `UA` stay `None`
static CERTIFICATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(TV-(Y7|Y|G|PG|14|MA)(-FV)?|G|PG|PG-13|R|NC-17|NR|Not Rated|Unrated|Approved|Passed)$")
        .unwrap()
});

const MAX_GENRES: usize = 4;
const MAX_CAST: usize = 5;

/// Read the structured fields of a title page.
///
/// Each field degrades to `None`/empty on its own. A page carrying none of
/// them yields the empty record.
pub fn extract_details(document: &Html) -> Result<TitleDetails, ExtractionError> {
    let plot_sels = [
        selector(r#"[data-testid="plot-xl"]"#)?,
        selector(r#"[data-testid="plot-l"]"#)?,
        selector(r#"[data-testid="plot"]"#)?,
    ];
    let description = plot_sels
        .iter()
        .find_map(|sel| document.select(sel).map(text_of).find(|t| !t.is_empty()));

    let mut details = TitleDetails {
        description,
        genres: texts(document, r#"[data-testid="genres"] a span"#, MAX_GENRES)?,
        cast: texts(document, r#"[data-testid="title-cast-item__actor"]"#, MAX_CAST)?,
        runtime: None,
        mpaa: None,
    };

    if details.genres.is_empty() {
        details.genres = texts(document, r#"[data-testid="genres"] a"#, MAX_GENRES)?;
    }

    let meta_sel = selector(r#"[data-testid="hero-title-block__metadata"] li"#)?;
    for token in document.select(&meta_sel).map(text_of) {
        if RUNTIME.is_match(&token) {
            details.runtime = Some(token);
        } else if CERTIFICATION.is_match(&token) {
            details.mpaa = Some(token);
        }
    }

    Ok(details)
}

fn texts(document: &Html, css: &str, max: usize) -> Result<Vec<String>, ExtractionError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .take(max)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect())
}

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::domain::title::NO_RATING;
use crate::domain::TitleSummary;
use crate::scripts::{first_text, selector, text_of, ExtractionError};

static RANK_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());
static TITLE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tt\d+").unwrap());
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
static LEADING_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)").unwrap());
static VOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]+)\)").unwrap());
static ARIA_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rating: ([\d.]+)").unwrap());
static POSTER_SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_V1_.*\.jpg$").unwrap());

/// Extract every list item of a ranked or search listing page.
///
/// Items without both a title and a `tt` identifier are skipped.
pub fn extract_titles(document: &Html) -> Result<Vec<TitleSummary>, ExtractionError> {
    let item_sel = selector(".ipc-metadata-list-summary-item")?;
    let title_sel = selector(".ipc-title__text")?;
    let link_sel = selector("a.ipc-metadata-list-summary-item__t, a.ipc-title-link-wrapper")?;
    let img_sel = selector("img")?;
    let meta_sel = selector(".ipc-metadata-list-summary-item__li, .cli-title-metadata-item")?;
    let rating_sel = selector(".ipc-rating-star")?;

    let mut titles = Vec::new();

    for item in document.select(&item_sel) {
        let link = item.select(&link_sel).next();
        let img = item.select(&img_sel).next();

        // Title element, then link text, then poster alt text
        let raw_title = first_text(item, &title_sel)
            .or_else(|| link.map(text_of).filter(|t| !t.is_empty()))
            .or_else(|| img.and_then(|i| i.value().attr("alt")).map(str::to_string))
            .unwrap_or_default();
        let title = RANK_PREFIX.replace(raw_title.trim(), "").to_string();

        let id = link
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| TITLE_ID.find(href))
            .map(|m| m.as_str().to_string());

        let (Some(id), true) = (id, title.chars().count() > 1) else {
            continue;
        };

        let image = img
            .and_then(|i| i.value().attr("src"))
            .map(upgrade_image)
            .unwrap_or_default();

        let year = item
            .select(&meta_sel)
            .filter_map(|m| {
                let text = text_of(m);
                YEAR.captures(&text).and_then(|c| c[1].parse::<u16>().ok())
            })
            .last()
            .unwrap_or(0);

        let (rating, vote_count) = item
            .select(&rating_sel)
            .next()
            .map(parse_rating_star)
            .unwrap_or_else(|| (NO_RATING.to_string(), 0));

        titles.push(TitleSummary {
            id,
            title,
            image,
            year,
            rating,
            vote_count,
        });
    }

    Ok(titles)
}

/// Read `"7.5 (25K)"`-style rating text, falling back to the aria label
fn parse_rating_star(star: ElementRef<'_>) -> (String, u64) {
    let text = text_of(star);

    let rating = LEADING_RATING
        .captures(&text)
        .map(|c| c[1].to_string())
        .or_else(|| {
            star.value()
                .attr("aria-label")
                .and_then(|aria| ARIA_RATING.captures(aria))
                .map(|c| c[1].to_string())
        })
        .unwrap_or_else(|| NO_RATING.to_string());

    let vote_count = VOTES
        .captures(&text)
        .map(|c| parse_vote_count(&c[1]))
        .unwrap_or(0);

    (rating, vote_count)
}

/// Expand a vote-count shorthand: `"25K"` → 25000, `"1.2M"` → 1200000.
///
/// Text without any digit (e.g. `"Rate"`) counts as zero.
pub fn parse_vote_count(text: &str) -> u64 {
    let upper = text.to_uppercase();
    if !upper.chars().any(|c| c.is_ascii_digit()) {
        return 0;
    }

    let multiplier = if upper.contains('K') {
        1_000.0
    } else if upper.contains('M') {
        1_000_000.0
    } else {
        1.0
    };

    let digits: String = upper
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match digits.parse::<f64>() {
        Ok(value) => (value * multiplier).round() as u64,
        Err(_) => 0,
    }
}

/// Rewrite a poster URL's size suffix to request a 600px-wide rendition
pub fn upgrade_image(url: &str) -> String {
    POSTER_SIZE
        .replace(url, "_V1_FMjpg_UX600_.jpg")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <ul>
          <li class="ipc-metadata-list-summary-item">
            <img alt="Dune: Part Two" src="https://m.media-amazon.com/images/M/abc._V1_QL75_UX140_CR0,1,140,207_.jpg">
            <a class="ipc-title-link-wrapper" href="/title/tt15239678/?ref_=sr_t_1">
              <h3 class="ipc-title__text">1. Dune: Part Two</h3>
            </a>
            <div>
              <span class="cli-title-metadata-item">2024</span>
              <span class="cli-title-metadata-item">2h 46m</span>
              <span class="cli-title-metadata-item">PG-13</span>
            </div>
            <span class="ipc-rating-star" aria-label="IMDb rating: 8.5">8.5 (652K)</span>
          </li>
          <li class="ipc-metadata-list-summary-item">
            <img alt="Shogun" src="https://example.com/shogun.png">
            <a class="ipc-title-link-wrapper" href="/title/tt2788316/"></a>
            <span class="ipc-metadata-list-summary-item__li">2024–</span>
            <span class="ipc-rating-star" aria-label="Rating: 8.6">(Rate)</span>
          </li>
          <li class="ipc-metadata-list-summary-item">
            <h3 class="ipc-title__text">3. No Link Here</h3>
          </li>
          <li class="ipc-metadata-list-summary-item">
            <a class="ipc-title-link-wrapper" href="/title/tt0000001/"><h3 class="ipc-title__text"> </h3></a>
          </li>
        </ul>
    "#;

    fn titles() -> Vec<TitleSummary> {
        extract_titles(&Html::parse_document(LISTING)).unwrap()
    }

    #[test]
    fn test_extracts_full_item() {
        let titles = titles();
        let dune = &titles[0];
        assert_eq!(dune.id, "tt15239678");
        assert_eq!(dune.title, "Dune: Part Two");
        assert_eq!(dune.year, 2024);
        assert_eq!(dune.rating, "8.5");
        assert_eq!(dune.vote_count, 652_000);
        assert_eq!(
            dune.image,
            "https://m.media-amazon.com/images/M/abc._V1_FMjpg_UX600_.jpg"
        );
    }

    #[test]
    fn test_title_falls_back_to_image_alt_and_rating_to_aria() {
        let titles = titles();
        let shogun = &titles[1];
        assert_eq!(shogun.id, "tt2788316");
        assert_eq!(shogun.title, "Shogun");
        assert_eq!(shogun.year, 2024);
        assert_eq!(shogun.rating, "8.6");
        assert_eq!(shogun.vote_count, 0);
        assert_eq!(shogun.image, "https://example.com/shogun.png");
    }

    #[test]
    fn test_items_without_id_or_title_are_dropped() {
        let titles = titles();
        assert_eq!(titles.len(), 2);
        assert!(titles.iter().all(|t| t.id != "tt0000001"));
    }

    #[test]
    fn test_missing_rating_star_is_na() {
        let html = r#"<li class="ipc-metadata-list-summary-item">
            <a class="ipc-metadata-list-summary-item__t" href="/title/tt7/">Se7en</a></li>"#;
        let titles = extract_titles(&Html::parse_document(html)).unwrap();
        assert_eq!(titles[0].title, "Se7en");
        assert_eq!(titles[0].rating, NO_RATING);
        assert_eq!(titles[0].year, 0);
    }

    #[test]
    fn test_parse_vote_count() {
        assert_eq!(parse_vote_count("25K"), 25_000);
        assert_eq!(parse_vote_count("1.2M"), 1_200_000);
        assert_eq!(parse_vote_count("342"), 342);
        assert_eq!(parse_vote_count("1,234"), 1_234);
        assert_eq!(parse_vote_count("2.5k"), 2_500);
        assert_eq!(parse_vote_count("Rate"), 0);
        assert_eq!(parse_vote_count(""), 0);
    }

    #[test]
    fn test_upgrade_image_leaves_other_urls() {
        assert_eq!(upgrade_image("https://x/y.png"), "https://x/y.png");
        assert_eq!(upgrade_image(""), "");
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::TorrentConfig;
use crate::torrent::{SearchHit, TorrentError, TorrentSearch};

/// Hash the index returns in its single "no results" row
const EMPTY_HASH: &str = "0000000000000000000000000000000000000000";

/// Client for the apibay JSON torrent index
pub struct ApibayClient {
    client: Client,
    endpoint: String,
}

/// Row as returned by the index; every field is a string
#[derive(Debug, Deserialize)]
struct ApibayRow {
    name: String,
    info_hash: String,
    #[serde(default)]
    seeders: String,
    #[serde(default)]
    size: String,
}

impl ApibayClient {
    pub fn new(config: &TorrentConfig) -> Result<Self, TorrentError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl TorrentSearch for ApibayClient {
    async fn search(
        &self,
        query: &str,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, TorrentError> {
        debug!("Searching torrents for: {}", query);

        let url = Url::parse_with_params(&self.endpoint, &[("q", query), ("cat", category)])?;
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let body = response.text().await?;
        parse_rows(&body, limit)
    }
}

fn parse_rows(body: &str, limit: usize) -> Result<Vec<SearchHit>, TorrentError> {
    let rows: Vec<ApibayRow> =
        serde_json::from_str(body).map_err(|e| TorrentError::Malformed(e.to_string()))?;

    Ok(rows
        .into_iter()
        .filter(|row| row.info_hash != EMPTY_HASH)
        .take(limit)
        .map(|row| SearchHit {
            magnet: magnet_link(&row.info_hash, &row.name),
            seeds: row.seeders.trim().parse().unwrap_or(0),
            size: row
                .size
                .trim()
                .parse::<u64>()
                .map(format_size)
                .unwrap_or(row.size),
            title: row.name,
        })
        .collect())
}

fn magnet_link(info_hash: &str, name: &str) -> Option<String> {
    let hash = info_hash.trim();
    if hash.is_empty() {
        return None;
    }
    let display_name: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    Some(format!("magnet:?xt=urn:btih:{}&dn={}", hash, display_name))
}

/// Render a byte count with binary units, e.g. `1.5 GiB`
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"[
        {"id":"1","name":"Film 2024 1080p WEB","info_hash":"ABCDEF0123456789ABCDEF0123456789ABCDEF01","leechers":"3","seeders":"120","size":"1610612736","category":"207"},
        {"id":"2","name":"Film 2024 720p","info_hash":"1111111111111111111111111111111111111111","seeders":"x","size":"unknown"}
    ]"#;

    #[test]
    fn test_parse_rows() {
        let hits = parse_rows(RESPONSE, 20).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Film 2024 1080p WEB");
        assert_eq!(hits[0].seeds, 120);
        assert_eq!(hits[0].size, "1.5 GiB");
        assert_eq!(
            hits[0].magnet.as_deref(),
            Some("magnet:?xt=urn:btih:ABCDEF0123456789ABCDEF0123456789ABCDEF01&dn=Film+2024+1080p+WEB")
        );
        assert_eq!(hits[1].seeds, 0);
        assert_eq!(hits[1].size, "unknown");
    }

    #[test]
    fn test_no_results_row_is_skipped() {
        let body = r#"[{"id":"0","name":"No results returned","info_hash":"0000000000000000000000000000000000000000","seeders":"0","size":"0"}]"#;
        assert!(parse_rows(body, 20).unwrap().is_empty());
    }

    #[test]
    fn test_limit_is_applied() {
        assert_eq!(parse_rows(RESPONSE, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(matches!(
            parse_rows("<html>rate limited</html>", 20),
            Err(TorrentError::Malformed(_))
        ));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(734_003_200), "700.0 MiB");
    }
}

//! Paginated saved-word list fetch.
//!
//! Page 1 is probed for the total page count, then pages are walked
//! sequentially. A page that comes back empty ends the walk early; the API
//! has been seen reporting more pages than it will actually serve.

use crate::pipeline::throttle::Throttle;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

pub const WORDLIST_PATH: &str = "/lapi/v1/wordlist/search";

/// Response envelope. The payload sits two levels down and every level is
/// optional on the wire, so each one defaults to empty.
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: SearchEnvelope,
}

#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: SearchPage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    items: Vec<SavedItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SavedItem {
    #[serde(default)]
    word: String,
}

/// Fetch every saved word, in list order.
pub async fn fetch_saved_words(
    client: &Client,
    base: &Url,
    per_page: u32,
    throttle: &Throttle,
) -> Result<Vec<String>> {
    throttle.pause().await;
    let probe = fetch_page(client, base, 1, per_page).await?;
    let total_pages = probe.total_pages;
    info!(total_pages, "saved-word list page count");

    let mut words = Vec::new();
    for page in 1..=total_pages {
        throttle.pause().await;
        let data = fetch_page(client, base, page, per_page).await?;
        if data.items.is_empty() {
            warn!(page, "page returned no items, stopping early");
            break;
        }
        let before = words.len();
        words.extend(
            data.items
                .into_iter()
                .map(|item| item.word)
                .filter(|word| !word.is_empty()),
        );
        info!(page, captured = words.len() - before, "captured words");
    }
    Ok(words)
}

async fn fetch_page(client: &Client, base: &Url, page: u32, per_page: u32) -> Result<SearchPage> {
    let url = base.join(WORDLIST_PATH).context("building wordlist URL")?;
    let response = client
        .get(url)
        .query(&[
            ("search", ""),
            ("sort", "newest"),
            ("filter", "dt"),
            ("page", page.to_string().as_str()),
            ("perPage", per_page.to_string().as_str()),
        ])
        .send()
        .await
        .with_context(|| format!("requesting wordlist page {page}"))?
        .error_for_status()
        .with_context(|| format!("wordlist page {page}"))?;

    let body: SearchResponse = response
        .json()
        .await
        .with_context(|| format!("decoding wordlist page {page}"))?;
    Ok(body.data.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_body(total_pages: u32, words: &[&str]) -> serde_json::Value {
        json!({
            "data": {
                "data": {
                    "totalPages": total_pages,
                    "items": words.iter().map(|w| json!({ "word": w })).collect::<Vec<_>>(),
                }
            }
        })
    }

    async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(WORDLIST_PATH))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_collects_words_across_all_pages() {
        let server = MockServer::start().await;
        mount_page(&server, 1, page_body(3, &["apple", "brine"])).await;
        mount_page(&server, 2, page_body(3, &["cairn", "dross"])).await;
        mount_page(&server, 3, page_body(3, &["ennui"])).await;

        let base = Url::parse(&server.uri()).unwrap();
        let throttle = Throttle::new(0);
        let words = fetch_saved_words(&Client::new(), &base, 16, &throttle)
            .await
            .unwrap();

        assert_eq!(words, vec!["apple", "brine", "cairn", "dross", "ennui"]);
    }

    #[tokio::test]
    async fn test_stops_at_first_empty_page() {
        let server = MockServer::start().await;
        mount_page(&server, 1, page_body(3, &["apple"])).await;
        mount_page(&server, 2, page_body(3, &[])).await;

        // Page 3 must never be requested once page 2 comes back empty.
        Mock::given(method("GET"))
            .and(path(WORDLIST_PATH))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(3, &["zetetic"])))
            .expect(0)
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let throttle = Throttle::new(0);
        let words = fetch_saved_words(&Client::new(), &base, 16, &throttle)
            .await
            .unwrap();

        assert_eq!(words, vec!["apple"]);
    }

    #[tokio::test]
    async fn test_blank_word_fields_are_dropped() {
        let server = MockServer::start().await;
        let body = json!({
            "data": { "data": {
                "totalPages": 1,
                "items": [ { "word": "apple" }, { "word": "" }, {} ],
            }}
        });
        mount_page(&server, 1, body).await;

        let base = Url::parse(&server.uri()).unwrap();
        let throttle = Throttle::new(0);
        let words = fetch_saved_words(&Client::new(), &base, 16, &throttle)
            .await
            .unwrap();

        assert_eq!(words, vec!["apple"]);
    }

    #[tokio::test]
    async fn test_missing_envelope_means_no_pages() {
        let server = MockServer::start().await;
        mount_page(&server, 1, json!({})).await;

        let base = Url::parse(&server.uri()).unwrap();
        let throttle = Throttle::new(0);
        let words = fetch_saved_words(&Client::new(), &base, 16, &throttle)
            .await
            .unwrap();

        assert!(words.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(WORDLIST_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let throttle = Throttle::new(0);
        let result = fetch_saved_words(&Client::new(), &base, 16, &throttle).await;

        assert!(result.is_err());
    }
}

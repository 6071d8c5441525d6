use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::app::ports::WebLookupPort;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

// How many result snippets to fold into one description
const SNIPPET_LIMIT: usize = 2;

static SNIPPET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__snippet").expect("valid snippet selector"));

/// Reqwest-backed adapter for the web lookup service: one HTML search
/// request per query, snippet text extracted from the result page.
pub struct HttpWebLookupClient {
    client: reqwest::Client,
}

impl HttpWebLookupClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    fn extract_snippets(body: &str) -> String {
        let document = Html::parse_document(body);
        let snippets: Vec<String> = document
            .select(&SNIPPET_SELECTOR)
            .take(SNIPPET_LIMIT)
            .map(|el| {
                el.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|s| !s.is_empty())
            .collect();
        snippets.join("; ")
    }
}

#[async_trait]
impl WebLookupPort for HttpWebLookupClient {
    async fn lookup(&self, query: &str) -> Result<String, String> {
        tracing::debug!(%query, "sending web lookup request");
        let resp = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[("q", query)])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("search service returned {}", resp.status()));
        }

        let body = resp.text().await.map_err(|e| e.to_string())?;
        // Parse synchronously; the document must not be held across awaits
        Ok(Self::extract_snippets(&body))
    }
}

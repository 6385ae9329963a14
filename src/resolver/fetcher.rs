//! Sitemap document fetching and `<loc>` extraction

use std::future::Future;
use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

/// Default user agent for sitemap requests. Some sites refuse obviously
/// robotic agents, so this mimics a browser.
pub const SITEMAP_USER_AGENT: &str = "Mozilla/5.0";

/// Default per-request timeout for sitemap fetches.
pub const SITEMAP_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of sitemap location lists.
///
/// The contract is best-effort: implementations return the `<loc>` entries of
/// the document at `sitemap_url` in document order, or an empty vec on any
/// failure. A missing sitemap is indistinguishable from a transient fetch
/// error; neither surfaces as an error to the caller.
pub trait SitemapFetcher: Send + Sync {
    /// Fetch a sitemap document and return its `<loc>` entries.
    fn fetch_locations(&self, sitemap_url: &str) -> impl Future<Output = Vec<String>> + Send;
}

/// Production fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSitemapFetcher {
    client: reqwest::Client,
}

impl HttpSitemapFetcher {
    /// Create a fetcher with the default browser-like user agent and timeout.
    pub fn new() -> Self {
        Self::with_timeout(SITEMAP_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(SITEMAP_USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpSitemapFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapFetcher for HttpSitemapFetcher {
    async fn fetch_locations(&self, sitemap_url: &str) -> Vec<String> {
        let response = match self.client.get(sitemap_url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch sitemap {}: {}", sitemap_url, e);
                return Vec::new();
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!("Sitemap {} returned error status: {}", sitemap_url, e);
                return Vec::new();
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read sitemap body from {}: {}", sitemap_url, e);
                return Vec::new();
            }
        };

        let locs = parse_locations(&body);
        debug!("Fetched {} locations from {}", locs.len(), sitemap_url);
        locs
    }
}

/// Extract the text content of every `<loc>` element, in document order.
/// Malformed XML yields an empty vec rather than a partial result.
pub fn parse_locations(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locations = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                if let Ok(text) = t.unescape() {
                    let text = text.trim();
                    if !text.is_empty() {
                        locations.push(text.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Malformed sitemap XML: {}", e);
                return Vec::new();
            }
            _ => {}
        }
    }

    locations
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP_INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://www.example.com/posts.xml</loc></sitemap>
  <sitemap><loc>https://www.example.com/pages.xml</loc></sitemap>
</sitemapindex>"#;

    const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.example.com/a</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://www.example.com/b</loc></url>
</urlset>"#;

    #[test]
    fn test_parse_sitemap_index() {
        let locs = parse_locations(SITEMAP_INDEX);
        assert_eq!(
            locs,
            vec![
                "https://www.example.com/posts.xml",
                "https://www.example.com/pages.xml"
            ]
        );
    }

    #[test]
    fn test_parse_urlset_ignores_other_elements() {
        let locs = parse_locations(URLSET);
        assert_eq!(
            locs,
            vec!["https://www.example.com/a", "https://www.example.com/b"]
        );
    }

    #[test]
    fn test_parse_malformed_xml_returns_empty() {
        assert!(parse_locations("<urlset><loc>https://x</urlset>").is_empty());
        assert!(parse_locations("not xml at all <<<<").is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_locations("").is_empty());
        assert!(parse_locations("<urlset></urlset>").is_empty());
    }

    #[tokio::test]
    async fn test_http_fetcher_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sitemap.xml")
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(URLSET)
            .create_async()
            .await;

        let fetcher = HttpSitemapFetcher::new();
        let url = format!("{}/sitemap.xml", server.url());
        let locs = fetcher.fetch_locations(&url).await;

        mock.assert_async().await;
        assert_eq!(
            locs,
            vec!["https://www.example.com/a", "https://www.example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_http_fetcher_absorbs_404() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sitemap.xml")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpSitemapFetcher::new();
        let url = format!("{}/sitemap.xml", server.url());
        assert!(fetcher.fetch_locations(&url).await.is_empty());
    }

    #[tokio::test]
    async fn test_http_fetcher_absorbs_connection_error() {
        let fetcher = HttpSitemapFetcher::new();
        // Nothing listens on this port.
        let locs = fetcher
            .fetch_locations("http://127.0.0.1:9/sitemap.xml")
            .await;
        assert!(locs.is_empty());
    }
}

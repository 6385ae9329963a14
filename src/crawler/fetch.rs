//! Two-stage page fetching: static HTTP first, headless render second

use spider::compact_str::CompactString;
use spider::website::Website;
use tracing::{debug, instrument, warn};

use crate::crawler::CrawlerConfig;
use crate::crawler::content_extraction::{extract_paragraph_text, extract_text};
use crate::crawler::error::ScrapeError;

/// Per-page scraper with an explicit two-stage strategy.
///
/// Stage one issues a plain HTTP GET and extracts the document's text. Stage
/// two, invoked only when stage one produced no text, renders the page in
/// headless Chrome and extracts paragraph text. Both stages report failures
/// as errors internally; [`PageScraper::fetch_text`] absorbs them so callers
/// only ever see a (possibly empty) string.
#[derive(Debug, Clone)]
pub struct PageScraper {
    client: reqwest::Client,
    config: CrawlerConfig,
}

impl PageScraper {
    pub fn new(config: CrawlerConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout())
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Fetch a page and return its extracted text.
    ///
    /// Never fails: a page that cannot be fetched or carries no extractable
    /// text yields an empty string.
    #[instrument(skip(self))]
    pub async fn fetch_text(&self, url: &str) -> String {
        match self.fetch_static(url).await {
            Ok(text) if text.len() >= self.config.min_text_bytes.max(1) => {
                debug!("Static fetch yielded {} bytes for {}", text.len(), url);
                return text;
            }
            Ok(_) => debug!("Static fetch yielded no usable text for {}", url),
            Err(e) => warn!("Static fetch failed for {}: {}", url, e),
        }

        if !self.config.render_fallback {
            return String::new();
        }

        match self.fetch_rendered(url).await {
            Ok(text) => {
                debug!("Rendered fetch yielded {} chars for {}", text.len(), url);
                text
            }
            Err(e) => {
                warn!("Rendered fetch failed for {}: {}", url, e);
                String::new()
            }
        }
    }

    /// Stage one: plain GET plus whole-document text extraction.
    pub(crate) async fn fetch_static(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let body = response.text().await?;
        Ok(extract_text(&body))
    }

    /// Stage two: single-page headless Chrome render plus paragraph text
    /// extraction.
    async fn fetch_rendered(&self, url: &str) -> Result<String, ScrapeError> {
        let mut website = Website::new(url);
        website.configuration.user_agent =
            Some(Box::new(CompactString::new(&self.config.user_agent)));
        website.with_depth(0);
        website.with_chrome_intercept(Default::default());

        website.scrape().await;

        let pages = website
            .get_pages()
            .ok_or_else(|| ScrapeError::Render(format!("no pages rendered for {url}")))?;
        let page = pages
            .first()
            .ok_or_else(|| ScrapeError::Render(format!("empty render result for {url}")))?;

        Ok(extract_paragraph_text(&page.get_html()))
    }
}

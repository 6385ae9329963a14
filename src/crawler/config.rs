//! Scraper configuration

use std::time::Duration;

/// Configuration for per-page scraping.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// User agent sent with static fetches and the rendered fallback.
    pub user_agent: String,

    /// Timeout for the static HTTP fetch, in seconds.
    pub http_timeout_secs: u64,

    /// Minimum extracted-text byte length treated as a usable result;
    /// anything shorter counts as empty and triggers the fallback.
    pub min_text_bytes: usize,

    /// Whether the headless-browser fallback may be used when the static
    /// fetch yields no text.
    pub render_fallback: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            http_timeout_secs: 10,
            min_text_bytes: 1,
            render_fallback: true,
        }
    }
}

/// Builder for [`CrawlerConfig`].
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the user agent to use for requests.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the static-fetch timeout in seconds.
    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    /// Set the minimum text length treated as a usable result.
    pub fn min_text_bytes(mut self, bytes: usize) -> Self {
        self.config.min_text_bytes = bytes;
        self
    }

    /// Enable or disable the headless-browser fallback.
    pub fn render_fallback(mut self, enabled: bool) -> Self {
        self.config.render_fallback = enabled;
        self
    }

    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// The static-fetch timeout as a [`Duration`].
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.min_text_bytes, 1);
        assert!(config.render_fallback);
    }

    #[test]
    fn test_builder() {
        let config = CrawlerConfig::builder()
            .user_agent("siteqa/0.1")
            .http_timeout_secs(5)
            .min_text_bytes(32)
            .render_fallback(false)
            .build();

        assert_eq!(config.user_agent, "siteqa/0.1");
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.min_text_bytes, 32);
        assert!(!config.render_fallback);
    }
}

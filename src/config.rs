//! Application configuration
//!
//! One explicit struct carries every knob the pipeline needs, assembled once
//! from CLI arguments and the environment and passed by reference from there
//! on. Modules never read process state themselves.

use crate::crawler::CrawlerConfig;
use crate::model::DEFAULT_COMPLETION_MODEL;
use crate::processor::ProcessorConfig;
use crate::search::SearchOptions;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the hosted completion and embedding models.
    pub gemini_api_key: String,

    /// Path of the local chunk-index database file.
    pub database_path: String,

    /// Completion model used for answer generation.
    pub completion_model: String,

    /// Maximum UTF-8 byte length of a single chunk.
    pub max_chunk_bytes: usize,

    /// Maximum concurrent embedding requests per page.
    pub embed_concurrency: usize,

    /// Number of chunks retrieved per question.
    pub top_k: usize,

    /// User agent for sitemap fetches and page scraping.
    pub user_agent: String,

    /// Whether pages with no static text get a headless-browser retry.
    pub render_fallback: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            database_path: "siteqa.db".to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            max_chunk_bytes: 36_000,
            embed_concurrency: 5,
            top_k: 3,
            user_agent: "Mozilla/5.0".to_string(),
            render_fallback: true,
        }
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set the Gemini API key.
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.gemini_api_key = key.into();
        self
    }

    /// Set the database file path.
    pub fn database_path(mut self, path: impl Into<String>) -> Self {
        self.config.database_path = path.into();
        self
    }

    /// Set the completion model name.
    pub fn completion_model(mut self, model: impl Into<String>) -> Self {
        self.config.completion_model = model.into();
        self
    }

    /// Set the maximum chunk size in bytes.
    pub fn max_chunk_bytes(mut self, bytes: usize) -> Self {
        self.config.max_chunk_bytes = bytes;
        self
    }

    /// Set the embedding concurrency limit.
    pub fn embed_concurrency(mut self, concurrency: usize) -> Self {
        self.config.embed_concurrency = concurrency;
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable the headless-browser fallback.
    pub fn render_fallback(mut self, enabled: bool) -> Self {
        self.config.render_fallback = enabled;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// The scraper configuration this application config implies.
    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::builder()
            .user_agent(self.user_agent.clone())
            .render_fallback(self.render_fallback)
            .build()
    }

    /// The processor configuration this application config implies.
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig::builder()
            .max_chunk_bytes(self.max_chunk_bytes)
            .embed_concurrency(self.embed_concurrency)
            .build()
    }

    /// The search options this application config implies.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { top_k: self.top_k }
    }
}

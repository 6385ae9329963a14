//! # Page scraper
//!
//! Fetches resolved content URLs and extracts their plain text for the
//! processing stage. Scraping is a two-stage strategy: a static HTTP fetch
//! with whole-document text extraction, then a single-page headless-Chrome
//! render collecting paragraph text, tried only when the static stage comes
//! back empty. Failures never propagate; a dead page is an empty string.

mod config;
mod content_extraction;
mod error;
mod fetch;

pub use config::CrawlerConfig;
pub use content_extraction::{extract_paragraph_text, extract_text};
pub use error::ScrapeError;
pub use fetch::PageScraper;

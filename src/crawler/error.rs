//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for scraping operations.
///
/// These stay internal to the two-stage fetch: the public entry point
/// absorbs them into an empty-text result after logging.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Headless browser fetch error
    #[error("Render error: {0}")]
    Render(String),
}

impl From<ScrapeError> for CrateError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Http(e) => CrateError::Http(e),
            ScrapeError::Render(_) => CrateError::Scrape(err.to_string()),
        }
    }
}

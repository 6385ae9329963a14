//! Error types for the siteqa crate

use thiserror::Error;

/// Result type for siteqa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for siteqa operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Page scraping error
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Content processing error
    #[error("Process error: {0}")]
    Process(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Search error
    #[error("Search error: {0}")]
    Search(String),
}

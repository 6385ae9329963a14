//! # siteqa - Sitemap-driven website question answering
//!
//! This crate ingests whole websites through their sitemaps and answers
//! questions about them with retrieval-augmented generation. A site's root
//! URL is resolved through its sitemap hierarchy into the definitive list of
//! content pages; each page is scraped, chunked, embedded, and stored in a
//! LibSQL vector index; questions are answered from the closest indexed
//! chunks alone.
//!
//! ## Features
//!
//! - Sitemap resolution with nested-index traversal and defined fallback
//!   for sites without a usable sitemap
//! - Two-stage page scraping: static HTTP first, headless render second
//! - Byte-capped, sentence-preferring text chunking
//! - Rate-limited embedding and completion through hosted models
//! - Vector indexing and retrieval with LibSQL
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use siteqa::config::AppConfig;
//! use siteqa::index::Database;
//! use siteqa::model::GeminiClient;
//! use siteqa::search::{SearchOptions, answer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::builder()
//!         .gemini_api_key("your-api-key")
//!         .build();
//!
//!     let client = GeminiClient::new_gemini(&config.gemini_api_key, &config.completion_model);
//!     let db = Database::new_from_path(&config.database_path).await?;
//!
//!     let answer = answer(&db, &client, "What does this site sell?", &config.search_options())
//!         .await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

#![recursion_limit = "256"]

mod error;

pub mod config;
pub mod crawler;
pub mod index;
pub mod model;
pub mod pipeline;
pub mod processor;
pub mod resolver;
pub mod search;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}

//! # Chunk index
//!
//! LibSQL-backed persistence for embedded page chunks: one row per chunk,
//! keyed by source URL, with the embedding in a vector-indexed blob column.

mod database;
pub mod error;
mod schema;

pub use database::Database;
pub use error::DbError;

//! Database schema for the chunk index
//!
//! One table holds everything: each row is a chunk of a scraped page keyed
//! by its source URL, with the embedding stored as an `F32_BLOB` column so
//! the vector index can search it. Replacing a URL's content is a delete of
//! its rows followed by fresh inserts, so no separate website table is
//! needed.

use libsql::{Connection, params};
use tracing::warn;

use crate::index::error::DbError;

/// Initialize the database schema.
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS chunks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            chunk TEXT NOT NULL,
            embedding F32_BLOB(768) NOT NULL,
            position INTEGER NOT NULL,
            indexed_at INTEGER NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create chunks table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_chunks_url ON chunks(url)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create url index: {}", e)))?;

    // The vector index needs the libsql vector extension; without it the
    // rest of the schema still works, only similarity search is unavailable.
    let vector_index = conn
        .execute(
            "CREATE INDEX IF NOT EXISTS chunks_idx ON chunks (libsql_vector_idx(embedding))",
            params![],
        )
        .await;

    if let Err(e) = vector_index {
        warn!(
            "Failed to create vector index: {}. Vector search will not be available.",
            e
        );
    }

    Ok(())
}

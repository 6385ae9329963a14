//! Database operations for the chunk index

use libsql::{Connection, Rows, params};
use tracing::{debug, instrument};

use crate::index::error::DbError;
use crate::index::schema;
use crate::model::EmbeddingConversion;
use crate::processor::ProcessedChunk;

/// Handle to the chunk index database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Wrap an existing connection, initializing the schema.
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, DbError> {
        schema::initialize_schema(&conn).await?;
        Ok(Self { conn })
    }

    /// Open (or create) a local database file.
    pub async fn new_from_path(path: &str) -> Result<Self, DbError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Execute a custom query with parameters.
    pub async fn execute_query<P>(&self, sql: &str, params: P) -> Result<Rows, DbError>
    where
        P: libsql::params::IntoParams,
    {
        self.conn
            .query(sql, params)
            .await
            .map_err(|e| DbError::Query(format!("Failed to execute query: {}", e)))
    }

    /// Replace all indexed chunks for a URL with a new set.
    ///
    /// Existing rows for the URL are deleted first, so reingesting a page
    /// never leaves stale chunks behind. Returns the number of rows
    /// inserted.
    #[instrument(skip(self, chunks), fields(url = url, chunks = chunks.len()))]
    pub async fn replace_chunks(
        &self,
        url: &str,
        chunks: &[ProcessedChunk],
    ) -> Result<usize, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM chunks WHERE url = ?", params![url])
            .await
            .map_err(|e| DbError::Query(format!("Failed to delete old chunks: {}", e)))?;
        debug!("Deleted {} existing rows for {}", deleted, url);

        let now = chrono::Utc::now().timestamp();
        let mut inserted = 0;
        for chunk in chunks {
            if chunk.text.is_empty() {
                continue;
            }
            self.conn
                .execute(
                    "INSERT INTO chunks (url, chunk, embedding, position, indexed_at)
                     VALUES (?, ?, ?, ?, ?)",
                    params![
                        url,
                        chunk.text.clone(),
                        chunk.embedding.to_binary(),
                        chunk.position as i64,
                        now,
                    ],
                )
                .await
                .map_err(|e| DbError::Query(format!("Failed to insert chunk: {}", e)))?;
            inserted += 1;
        }

        debug!("Inserted {} rows for {}", inserted, url);
        Ok(inserted)
    }

    /// All distinct indexed URLs, ordered for stable output.
    pub async fn list_urls(&self) -> Result<Vec<String>, DbError> {
        let mut rows = self
            .conn
            .query("SELECT DISTINCT url FROM chunks ORDER BY url", params![])
            .await
            .map_err(|e| DbError::Query(format!("Failed to list urls: {}", e)))?;

        let mut urls = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DbError::Data(format!("Failed to read url row: {}", e)))?
        {
            let url: String = row
                .get(0)
                .map_err(|e| DbError::Data(format!("Failed to get url: {}", e)))?;
            urls.push(url);
        }
        Ok(urls)
    }

    /// Number of chunks stored for a URL.
    pub async fn count_chunks_for_url(&self, url: &str) -> Result<i64, DbError> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM chunks WHERE url = ?", params![url])
            .await
            .map_err(|e| DbError::Query(format!("Failed to count chunks: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get(0)
                .map_err(|e| DbError::Data(format!("Failed to get count: {}", e))),
            Ok(None) => Ok(0),
            Err(e) => Err(DbError::Data(format!("Failed to read count row: {}", e))),
        }
    }
}

//! Error types for the index module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Errors that can occur during index database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to open or connect to the database
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failed to create or migrate the schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// A query failed
    #[error("Query error: {0}")]
    Query(String),

    /// Returned data was missing or malformed
    #[error("Data error: {0}")]
    Data(String),
}

impl From<DbError> for CrateError {
    fn from(err: DbError) -> Self {
        CrateError::Database(err.to_string())
    }
}

impl From<libsql::Error> for DbError {
    fn from(err: libsql::Error) -> Self {
        DbError::Query(err.to_string())
    }
}

//! Error types for the processor module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for processor operations
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Embedding generation error
    #[error("Embedding generation error: {0}")]
    Embedding(String),

    /// Error during semaphore acquisition
    #[error("Semaphore acquisition error: {0}")]
    Semaphore(String),

    /// Error during task joining
    #[error("Task join error: {0}")]
    Task(String),
}

impl From<ProcessError> for CrateError {
    fn from(err: ProcessError) -> Self {
        CrateError::Process(err.to_string())
    }
}

impl From<tokio::sync::AcquireError> for ProcessError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        Self::Semaphore(format!("Failed to acquire semaphore: {}", err))
    }
}

impl From<tokio::task::JoinError> for ProcessError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(format!("Failed to join task: {}", err))
    }
}

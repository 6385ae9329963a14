//! # Content processor
//!
//! Turns scraped page text into embedded chunks ready for indexing: the text
//! is split into byte-capped, sentence-preferring chunks, then each chunk is
//! embedded through the configured embedding model with bounded concurrency.

mod chunking;
mod config;
mod error;

pub use chunking::chunk_text;
pub use config::{ChunkOptions, ProcessorConfig, ProcessorConfigBuilder};
pub use error::ProcessError;

use std::sync::Arc;

use futures::future;
use rig::{
    completion::CompletionModel,
    embeddings::{Embedding, EmbeddingModel},
};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument};

use crate::model::Client;

/// A chunk of page text with its embedding, ready for storage.
#[derive(Debug, Clone)]
pub struct ProcessedChunk {
    /// The source URL the chunk came from.
    pub source_url: String,

    /// The chunk text.
    pub text: String,

    /// The embedding of the chunk text.
    pub embedding: Embedding,

    /// Position of the chunk within its page, starting at 0.
    pub position: usize,
}

/// Generate the embedding for one chunk of text.
#[instrument(skip(client, text))]
pub async fn embed_chunk<C, E>(client: &Client<C, E>, text: &str) -> Result<Embedding, ProcessError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    let embeddings = client
        .embedding()
        .embed_texts(vec![text.to_string()])
        .await
        .map_err(|e| ProcessError::Embedding(e.to_string()))?;

    embeddings
        .into_iter()
        .next()
        .ok_or_else(|| ProcessError::Embedding("model returned no embedding".to_string()))
}

/// Chunk a page's text and embed every chunk.
///
/// Chunks are embedded concurrently up to the configured limit; the returned
/// vec preserves chunk order, so positions are stable across reprocessing.
#[instrument(skip(client, text), fields(url = url))]
pub async fn process_page<C, E>(
    client: &Client<C, E>,
    url: &str,
    text: &str,
    config: &ProcessorConfig,
) -> Result<Vec<ProcessedChunk>, ProcessError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let chunks = chunk_text(text, &config.chunk_options);
    info!("Created {} chunks from {}", chunks.len(), url);

    let semaphore = Arc::new(Semaphore::new(config.embed_concurrency.max(1)));

    let tasks = chunks
        .into_iter()
        .enumerate()
        .map(|(position, chunk)| {
            let permit = semaphore.clone().acquire_owned();
            let client = client.clone();
            let url = url.to_string();

            tokio::spawn(async move {
                let _permit = permit.await?;

                debug!("Embedding chunk {} of {}", position, url);
                let embedding = embed_chunk(&client, &chunk).await?;

                Ok::<ProcessedChunk, ProcessError>(ProcessedChunk {
                    source_url: url,
                    text: chunk,
                    embedding,
                    position,
                })
            })
        })
        .collect::<Vec<_>>();

    let mut processed = Vec::with_capacity(tasks.len());
    for result in future::join_all(tasks).await {
        processed.push(result??);
    }

    Ok(processed)
}

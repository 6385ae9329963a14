//! # Mock models for testing
//!
//! In-memory stand-ins for the hosted completion and embedding models so
//! tests exercise the QA plumbing without network calls.

use std::sync::Arc;

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    embeddings::{Embedding, EmbeddingError, EmbeddingModel},
    one_or_many::OneOrMany,
};
use tokio::sync::Mutex;

/// A mock completion model returning a predefined response.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    response: Arc<Mutex<Option<OneOrMany<AssistantContent>>>>,
}

impl MockCompletionModel {
    /// Creates a mock that returns an empty text response until configured.
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
        }
    }

    /// Set the response the mock should return.
    pub async fn set_response(&self, response: OneOrMany<AssistantContent>) {
        let mut guard = self.response.lock().await;
        *guard = Some(response);
    }

    /// Helper to set a simple text response.
    pub async fn set_text_response(&self, text: &str) {
        self.set_response(OneOrMany::one(AssistantContent::text(text)))
            .await;
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        let response = {
            let guard = self.response.lock().await;
            guard.clone()
        };
        match response {
            Some(choice) => Ok(CompletionResponse {
                choice,
                raw_response: String::new(),
            }),
            None => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text("")),
                raw_response: String::new(),
            }),
        }
    }
}

/// A mock embedding model producing deterministic vectors derived from the
/// input text length.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dims: usize,
}

impl MockEmbeddingModel {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    const MAX_DOCUMENTS: usize = 1024;

    fn ndims(&self) -> usize {
        self.dims
    }

    async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts
            .into_iter()
            .map(|text| {
                let seed = text.len() as f64;
                Embedding {
                    vec: (0..self.dims).map(|i| seed + i as f64).collect(),
                    document: text,
                }
            })
            .collect())
    }
}

//! # Model client
//!
//! Unified access to the hosted completion and embedding models, with rate
//! limiting applied to both so long ingest runs do not exhaust API quotas.
//! The client is constructed from an explicit API key carried in the
//! application configuration; nothing here reads ambient process state.

pub mod embedding;
pub mod mock_model;
pub mod ratelimited_completion;
pub mod ratelimited_embedding;

pub use embedding::EmbeddingConversion;

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use rig::{completion::CompletionModel, embeddings::EmbeddingModel, providers::gemini};

use ratelimited_completion::RateLimitedCompletionModel;
use ratelimited_embedding::RateLimitedEmbeddingModel;

/// Default completion model for answer generation.
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-2.0-flash-001";

/// Paired completion and embedding models behind one handle.
#[derive(Debug, Clone)]
pub struct Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    completion_model: C,
    embedding_model: E,
}

/// The concrete Gemini-backed client type.
pub type GeminiClient = Client<
    RateLimitedCompletionModel<gemini::completion::CompletionModel>,
    RateLimitedEmbeddingModel<gemini::embedding::EmbeddingModel>,
>;

impl GeminiClient {
    /// Build a rate-limited Gemini client from an API key.
    pub fn new_gemini(api_key: &str, completion_model: &str) -> Self {
        let gemini_client = gemini::Client::new(api_key);

        let completion_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(2000).expect("must create rate limit"),
        ));
        let embedding_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(1000).expect("must create rate limit"),
        ));

        let completion_model = RateLimitedCompletionModel::new(
            gemini_client.completion_model(completion_model),
            completion_limiter,
        );
        let embedding_model = RateLimitedEmbeddingModel::new(
            gemini_client.embedding_model(gemini::embedding::EMBEDDING_004),
            embedding_limiter,
        );

        Self::new(completion_model, embedding_model)
    }
}

impl<C, E> Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    /// Pair arbitrary completion and embedding models.
    pub fn new(completion_model: C, embedding_model: E) -> Self {
        Self {
            completion_model,
            embedding_model,
        }
    }

    pub fn completion(&self) -> &C {
        &self.completion_model
    }

    pub fn embedding(&self) -> &E {
        &self.embedding_model
    }
}

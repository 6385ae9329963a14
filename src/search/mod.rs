//! # Retrieval and question answering
//!
//! Embeds a question, pulls the closest chunks out of the vector index, and
//! hands them to the completion model with a context-only prompt.

mod error;

pub use error::SearchError;

use rig::{
    agent::AgentBuilder,
    completion::{CompletionModel, Prompt},
    embeddings::EmbeddingModel,
};
use tracing::{debug, instrument};

use crate::index::Database;
use crate::model::{Client, EmbeddingConversion};

/// Options for retrieval.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of chunks to retrieve.
    pub top_k: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// A chunk retrieved by vector similarity.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Source URL of the chunk.
    pub url: String,

    /// The chunk text.
    pub text: String,

    /// Position of the chunk within its page.
    pub position: i64,
}

/// Build the answer prompt from retrieved context and the user's question.
///
/// The model is told to use only the provided context; an empty context
/// produces an honest "nothing indexed" style answer rather than an error.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Use only the below information to answer the question:\n\n{context}\n\nQuestion: {question}\nAnswer:"
    )
}

/// Embed a question and retrieve the closest indexed chunks.
#[instrument(skip(db, client))]
pub async fn retrieve<C, E>(
    db: &Database,
    client: &Client<C, E>,
    question: &str,
    options: &SearchOptions,
) -> Result<Vec<RetrievedChunk>, SearchError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    if options.top_k == 0 {
        return Err(SearchError::InvalidParameters(
            "top_k must be at least 1".to_string(),
        ));
    }

    let embedding = client
        .embedding()
        .embed_texts(vec![question.to_string()])
        .await
        .map_err(|e| SearchError::Embedding(format!("Failed to embed question: {}", e)))?
        .into_iter()
        .next()
        .ok_or_else(|| SearchError::Embedding("model returned no embedding".to_string()))?;

    let blob = embedding.to_binary();

    let mut rows = db
        .execute_query(
            "SELECT c.url, c.chunk, c.position
             FROM vector_top_k('chunks_idx', ?, ?) AS v
             JOIN chunks c ON c.rowid = v.id",
            libsql::params![blob, options.top_k as i64],
        )
        .await?;

    let mut chunks = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .map_err(|e| SearchError::ResultProcessing(format!("Failed to read row: {}", e)))?
    {
        chunks.push(RetrievedChunk {
            url: row
                .get(0)
                .map_err(|e| SearchError::ResultProcessing(e.to_string()))?,
            text: row
                .get(1)
                .map_err(|e| SearchError::ResultProcessing(e.to_string()))?,
            position: row
                .get(2)
                .map_err(|e| SearchError::ResultProcessing(e.to_string()))?,
        });
    }

    debug!("Retrieved {} chunks for question", chunks.len());
    Ok(chunks)
}

/// Generate an answer from already-retrieved context.
pub async fn answer_with_context<C>(
    completion_model: C,
    context: &str,
    question: &str,
) -> Result<String, SearchError>
where
    C: CompletionModel,
{
    let agent = AgentBuilder::new(completion_model).build();
    agent
        .prompt(build_prompt(context, question))
        .await
        .map_err(|e| SearchError::Completion(format!("Failed to generate answer: {}", e)))
}

/// Retrieve the top chunks for a question and answer it from them alone.
#[instrument(skip(db, client))]
pub async fn answer<C, E>(
    db: &Database,
    client: &Client<C, E>,
    question: &str,
    options: &SearchOptions,
) -> Result<String, SearchError>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel,
{
    let chunks = retrieve(db, client, question, options).await?;
    let context = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    answer_with_context(client.completion().clone(), &context, question).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock_model::MockCompletionModel;

    #[test]
    fn test_search_options_default() {
        assert_eq!(SearchOptions::default().top_k, 3);
    }

    #[test]
    fn test_build_prompt_shape() {
        let prompt = build_prompt("ctx line one\nctx line two", "What is this?");
        assert_eq!(
            prompt,
            "Use only the below information to answer the question:\n\n\
             ctx line one\nctx line two\n\nQuestion: What is this?\nAnswer:"
        );
    }

    #[tokio::test]
    async fn test_answer_with_context_uses_completion_model() {
        let model = MockCompletionModel::new();
        model.set_text_response("The answer.").await;

        let answer = answer_with_context(model, "Some context.", "A question?")
            .await
            .expect("mock completion succeeds");
        assert_eq!(answer, "The answer.");
    }
}

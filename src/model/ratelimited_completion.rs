use std::sync::Arc;

use governor::DefaultDirectRateLimiter;
use rig::completion::{CompletionError, CompletionModel, CompletionRequest, CompletionResponse};
use tracing::{Instrument, debug_span, info_span};

/// Completion model decorator that waits on a rate limiter before every call.
///
/// Transparent otherwise: the wrapped model's response type and content pass
/// through unchanged.
#[derive(Clone)]
pub struct RateLimitedCompletionModel<M: CompletionModel> {
    model: M,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<M> RateLimitedCompletionModel<M>
where
    M: CompletionModel,
{
    pub fn new(model: M, limiter: DefaultDirectRateLimiter) -> Self {
        Self {
            model,
            limiter: Arc::new(limiter),
        }
    }
}

impl<M: CompletionModel> CompletionModel for RateLimitedCompletionModel<M> {
    type Response = M::Response;

    async fn completion(
        &self,
        completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        self.limiter
            .until_ready()
            .instrument(debug_span!("limiter"))
            .await;
        self.model
            .completion(completion_request)
            .instrument(info_span!("completion"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use governor::{Quota, RateLimiter};
    use rig::{agent::AgentBuilder, completion::Prompt};

    use super::*;
    use crate::model::mock_model::MockCompletionModel;

    #[tokio::test]
    async fn test_response_passes_through() {
        let inner = MockCompletionModel::new();
        inner.set_text_response("limited but intact").await;

        let limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(60).expect("nonzero quota"),
        ));
        let model = RateLimitedCompletionModel::new(inner, limiter);

        let agent = AgentBuilder::new(model).build();
        let out = agent.prompt("anything").await.expect("completion succeeds");
        assert_eq!(out, "limited but intact");
    }
}

use super::{LlmClient, LlmRequest, LlmResponse};
use crate::errors::RunError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Wraps a client and records one `gen_ai.client.request` span per call.
pub struct TracingLlmClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmClient for TracingLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, RunError> {
        let span = info_span!(
            "gen_ai.client.request",
            "prism.provider" = self.inner.provider_name(),
            "gen_ai.request.model" = request.model.as_str(),
            "gen_ai.request.max_tokens" = request.max_tokens,
            "gen_ai.response.model" = tracing::field::Empty,
            "gen_ai.usage.input_tokens" = tracing::field::Empty,
            "gen_ai.usage.output_tokens" = tracing::field::Empty,
            "prism.latency_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.kind" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );

        async move {
            let result = self.inner.complete(request).await;
            let span = tracing::Span::current();

            match &result {
                Ok(resp) => {
                    span.record("gen_ai.response.model", resp.model.as_str());
                    span.record("gen_ai.usage.input_tokens", resp.prompt_tokens);
                    span.record("gen_ai.usage.output_tokens", resp.completion_tokens);
                    span.record(
                        "prism.latency_ms",
                        u64::try_from(resp.latency.as_millis()).unwrap_or(u64::MAX),
                    );
                }
                Err(e) => {
                    span.record("error", true);
                    span.record("error.kind", e.kind.as_str());
                    span.record("error.message", e.message.as_str());
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RunErrorKind;
    use crate::providers::llm::fake::FakeClient;

    fn req(prompt: &str) -> LlmRequest {
        LlmRequest {
            prompt: prompt.to_string(),
            model: "gpt-4".to_string(),
            max_tokens: 16,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let inner = Arc::new(FakeClient::new("gpt-4").with_response("fine"));
        let client = TracingLlmClient::new(inner);
        let resp = client.complete(&req("my prompt")).await.unwrap();
        assert_eq!(resp.text, "fine");
        assert_eq!(client.provider_name(), "fake");
    }

    #[tokio::test]
    async fn passes_errors_through_unchanged() {
        let inner = Arc::new(
            FakeClient::new("gpt-4").fail_when("", RunError::provider_rate_limit(429, "fake", "slow down")),
        );
        let client = TracingLlmClient::new(inner);
        let err = client.complete(&req("anything")).await.unwrap_err();
        assert_eq!(err.kind, RunErrorKind::ProviderRateLimit);
        assert_eq!(err.status, Some(429));
    }
}

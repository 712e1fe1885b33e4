use super::{LlmClient, LlmRequest, LlmResponse};
use crate::config::OptimizerConfig;
use crate::errors::RunError;
use async_trait::async_trait;
use serde_json::json;
use std::time::{Duration, Instant};

const PROVIDER: &str = "openai";

pub struct OpenAIClient {
    pub api_base: String,
    api_key: String,
    pub timeout: Duration,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RunError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunError::other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            timeout,
            client,
        })
    }

    /// Build from configuration; the API key must be set.
    pub fn from_config(cfg: &OptimizerConfig) -> Result<Self, RunError> {
        let key = cfg.api_key.as_ref().ok_or_else(|| {
            RunError::missing_config("testing variants requires an API key (OPENAI_API_KEY)")
        })?;
        Self::new(cfg.api_base.clone(), key.expose(), cfg.timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

fn transport_error(e: &reqwest::Error) -> RunError {
    if e.is_timeout() {
        RunError::provider_timeout(PROVIDER, e.to_string())
    } else {
        RunError::network(PROVIDER, e.to_string())
    }
}

/// Completion text and token usage pulled out of a chat completions body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCompletion {
    pub text: String,
    pub model: Option<String>,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

pub fn parse_chat_completion(json: &serde_json::Value) -> Result<ParsedCompletion, RunError> {
    let text = json
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RunError::malformed_response(PROVIDER, "missing content"))?
        .to_string();

    let usage_field = |name: &str| -> Result<u32, RunError> {
        json.pointer(&format!("/usage/{}", name))
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| RunError::malformed_response(PROVIDER, format!("missing usage.{}", name)))
    };

    Ok(ParsedCompletion {
        text,
        model: json
            .get("model")
            .and_then(|v| v.as_str())
            .map(ToString::to_string),
        prompt_tokens: usage_field("prompt_tokens")?,
        completion_tokens: usage_field("completion_tokens")?,
    })
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, RunError> {
        let url = self.endpoint();
        crate::providers::network::check_outbound(PROVIDER, &url)?;

        let body = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let start = Instant::now();
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| transport_error(&e))?;
        let latency = start.elapsed();

        if !status.is_success() {
            return Err(RunError::from_status(status.as_u16(), PROVIDER, text));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| RunError::malformed_response(PROVIDER, format!("invalid JSON: {}", e)))?;
        let parsed = parse_chat_completion(&json)?;

        Ok(LlmResponse {
            text: parsed.text,
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
            prompt_tokens: parsed.prompt_tokens,
            completion_tokens: parsed.completion_tokens,
            latency,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

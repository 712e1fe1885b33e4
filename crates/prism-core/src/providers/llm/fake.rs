use super::{LlmClient, LlmRequest, LlmResponse};
use crate::errors::RunError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum FakeReply {
    Text(String),
    Fail(RunError),
}

/// Deterministic in-process client. Replies are picked by the first rule whose
/// needle occurs in the prompt, falling back to the default response.
#[derive(Debug)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
    rules: Vec<(String, FakeReply)>,
    usage: Option<(u32, u32)>,
    latency: Duration,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fixed_response: None,
            rules: Vec::new(),
            usage: None,
            latency: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    pub fn respond_when(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules
            .push((needle.into(), FakeReply::Text(response.into())));
        self
    }

    pub fn fail_when(mut self, needle: impl Into<String>, error: RunError) -> Self {
        self.rules.push((needle.into(), FakeReply::Fail(error)));
        self
    }

    /// Fixed token usage for every call instead of word counts.
    pub fn with_usage(mut self, prompt_tokens: u32, completion_tokens: u32) -> Self {
        self.usage = Some((prompt_tokens, completion_tokens));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

fn word_tokens(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, RunError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        let text = match reply {
            Some(FakeReply::Fail(err)) => return Err(err),
            Some(FakeReply::Text(text)) => text,
            None => self
                .fixed_response
                .clone()
                .unwrap_or_else(|| format!("echo: {}", request.prompt)),
        };

        let (prompt_tokens, completion_tokens) = self
            .usage
            .unwrap_or_else(|| (word_tokens(&request.prompt), word_tokens(&text)));

        Ok(LlmResponse {
            text,
            model: self.model.clone(),
            prompt_tokens,
            completion_tokens,
            latency: self.latency,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

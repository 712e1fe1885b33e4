pub mod diagnostic;

pub use diagnostic::Diagnostic;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunErrorKind {
    InvalidInput,
    MissingConfig,
    ConfigParse,
    ProviderAuth,
    ProviderRateLimit,
    ProviderTimeout,
    ProviderServer,
    Network,
    MalformedResponse,
    Other,
}

impl RunErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunErrorKind::InvalidInput => "invalid_input",
            RunErrorKind::MissingConfig => "missing_config",
            RunErrorKind::ConfigParse => "config_parse",
            RunErrorKind::ProviderAuth => "provider_auth",
            RunErrorKind::ProviderRateLimit => "provider_rate_limit",
            RunErrorKind::ProviderTimeout => "provider_timeout",
            RunErrorKind::ProviderServer => "provider_server",
            RunErrorKind::Network => "network",
            RunErrorKind::MalformedResponse => "malformed_response",
            RunErrorKind::Other => "other",
        }
    }
}

impl Display for RunErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct RunError {
    pub kind: RunErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RunError {
    pub fn new(kind: RunErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            provider: None,
            detail: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::InvalidInput,
            format!("invalid input: {}", detail),
        )
        .with_detail(detail)
    }

    pub fn missing_config(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::MissingConfig,
            format!("config error: {}", detail),
        )
        .with_detail(detail)
    }

    pub fn config_parse(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::ConfigParse,
            format!("config error: {}", detail),
        )
        .with_detail(detail)
    }

    pub fn provider_auth(status: u16, provider: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::ProviderAuth,
            format!("{} rejected credentials (status {})", provider, status),
        )
        .with_status(status)
        .with_provider(provider)
        .with_detail(detail)
    }

    pub fn provider_rate_limit(status: u16, provider: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::ProviderRateLimit,
            format!("{} rate limit exceeded (status {})", provider, status),
        )
        .with_status(status)
        .with_provider(provider)
        .with_detail(detail)
    }

    pub fn provider_timeout(provider: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::ProviderTimeout,
            format!("{} request timed out", provider),
        )
        .with_provider(provider)
        .with_detail(detail)
    }

    pub fn provider_server(status: u16, provider: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::ProviderServer,
            format!("{} API error (status {})", provider, status),
        )
        .with_status(status)
        .with_provider(provider)
        .with_detail(detail)
    }

    pub fn network(provider: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::Network,
            format!("network error talking to {}: {}", provider, detail),
        )
        .with_provider(provider)
        .with_detail(detail)
    }

    pub fn malformed_response(provider: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::MalformedResponse,
            format!("malformed {} response: {}", provider, detail),
        )
        .with_provider(provider)
        .with_detail(detail)
    }

    pub fn other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(RunErrorKind::Other, detail.clone()).with_detail(detail)
    }

    /// Map a non-success HTTP status from the completion service to its error kind.
    pub fn from_status(status: u16, provider: &str, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::provider_auth(status, provider, body),
            429 => Self::provider_rate_limit(status, provider, body),
            408 | 504 => Self::provider_timeout(provider, body).with_status(status),
            _ => Self::provider_server(status, provider, body),
        }
    }

    /// Best-effort classification for errors that only arrive as text.
    pub fn classify_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let msg = message.to_lowercase();
        let kind = if msg.contains("invalid input") || msg.contains("empty prompt") {
            RunErrorKind::InvalidInput
        } else if msg.contains("config error") || msg.contains("unknown field") {
            RunErrorKind::ConfigParse
        } else if msg.contains("401")
            || msg.contains("unauthorized")
            || msg.contains("invalid api key")
            || msg.contains("incorrect api key")
        {
            RunErrorKind::ProviderAuth
        } else if msg.contains("rate limit") || msg.contains("429") {
            RunErrorKind::ProviderRateLimit
        } else if msg.contains("timeout") || msg.contains("timed out") {
            RunErrorKind::ProviderTimeout
        } else if msg.contains("network") || msg.contains("connection") || msg.contains("dns") {
            RunErrorKind::Network
        } else if msg.contains("malformed") || msg.contains("missing content") {
            RunErrorKind::MalformedResponse
        } else {
            RunErrorKind::Other
        };
        Self::new(kind, message)
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(run_error) = err.downcast_ref::<RunError>() {
            return run_error.clone();
        }
        Self::classify_message(err.to_string())
    }
}

/// Error raised while loading or validating the optimizer configuration.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::config_parse(err.0)
    }
}

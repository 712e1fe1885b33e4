use super::{RunError, RunErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: String,
    pub source: String,
    pub message: String,
    pub context: serde_json::Value,
    pub fix_steps: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: "error".into(),
            source: "unknown".into(),
            message: message.into(),
            context: serde_json::json!({}),
            fix_steps: vec![],
        }
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_fix_step(mut self, step: impl Into<String>) -> Self {
        self.fix_steps.push(step.into());
        self
    }

    pub fn format_terminal(&self) -> String {
        let icon = if self.severity == "warn" {
            "⚠️ "
        } else {
            "❌"
        };
        let mut s = format!("{} [{}] {}\n", icon, self.code, self.message);
        s.push_str(&format!("  source: {}\n", self.source));

        if self.context.as_object().is_some_and(|o| !o.is_empty()) {
            if let Ok(json) = serde_json::to_string_pretty(&self.context) {
                for line in json.lines() {
                    s.push_str(&format!("  {}\n", line));
                }
            }
        }

        if !self.fix_steps.is_empty() {
            s.push_str("\nFix:\n");
            for (i, step) in self.fix_steps.iter().enumerate() {
                s.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }
        s
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_terminal())
    }
}

impl std::error::Error for Diagnostic {}

pub mod codes {
    pub const E_INPUT: &str = "E_INPUT";
    pub const E_CFG_MISSING: &str = "E_CFG_MISSING";
    pub const E_CFG_PARSE: &str = "E_CFG_PARSE";
    pub const E_AUTH: &str = "E_AUTH";
    pub const E_RATE_LIMIT: &str = "E_RATE_LIMIT";
    pub const E_TIMEOUT: &str = "E_TIMEOUT";
    pub const E_PROVIDER: &str = "E_PROVIDER";
    pub const E_NETWORK: &str = "E_NETWORK";
    pub const E_MALFORMED: &str = "E_MALFORMED";
}

/// Map a run error to an actionable diagnostic, when there is advice to give.
pub fn diagnose(err: &RunError) -> Option<Diagnostic> {
    let context = serde_json::json!({
        "kind": err.kind.as_str(),
        "status": err.status,
        "provider": err.provider,
    });
    let diag = match err.kind {
        RunErrorKind::InvalidInput => Diagnostic::new(codes::E_INPUT, &err.message)
            .with_source("input")
            .with_fix_step("Pass a non-empty prompt, e.g. prism optimize \"Write a blog post about AI\"")
            .with_fix_step("Lower min_prompt_chars in prism.yaml to accept shorter prompts"),
        RunErrorKind::MissingConfig => Diagnostic::new(codes::E_CFG_MISSING, &err.message)
            .with_source("config")
            .with_fix_step("Set OPENAI_API_KEY or pass --api-key")
            .with_fix_step("Run with --no-test to only generate variants"),
        RunErrorKind::ConfigParse => Diagnostic::new(codes::E_CFG_PARSE, &err.message)
            .with_source("config")
            .with_fix_step("Check prism.yaml against the sample written by `prism init`"),
        RunErrorKind::ProviderAuth => Diagnostic::new(codes::E_AUTH, &err.message)
            .with_source("provider")
            .with_context(context)
            .with_fix_step("Verify OPENAI_API_KEY is valid and has access to the configured model"),
        RunErrorKind::ProviderRateLimit => Diagnostic::new(codes::E_RATE_LIMIT, &err.message)
            .with_severity("warn")
            .with_source("provider")
            .with_context(context)
            .with_fix_step("Wait and re-run; failed variants are not retried automatically"),
        RunErrorKind::ProviderTimeout => Diagnostic::new(codes::E_TIMEOUT, &err.message)
            .with_severity("warn")
            .with_source("provider")
            .with_context(context)
            .with_fix_step("Increase timeout_secs or lower max_tokens"),
        RunErrorKind::ProviderServer => Diagnostic::new(codes::E_PROVIDER, &err.message)
            .with_source("provider")
            .with_context(context),
        RunErrorKind::Network => Diagnostic::new(codes::E_NETWORK, &err.message)
            .with_source("network")
            .with_context(context)
            .with_fix_step("Check connectivity to api_base, or unset PRISM_NETWORK_POLICY=deny"),
        RunErrorKind::MalformedResponse => Diagnostic::new(codes::E_MALFORMED, &err.message)
            .with_source("provider")
            .with_context(context)
            .with_fix_step("Confirm api_base points at an OpenAI-compatible chat completions API"),
        RunErrorKind::Other => return None,
    };
    Some(diag)
}

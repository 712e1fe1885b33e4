use crate::errors::ConfigError;
use crate::pricing::PricingTable;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Bearer token for the completion service. Never serialized or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    pub version: u32,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Trimmed prompts shorter than this are rejected by the CLI.
    pub min_prompt_chars: usize,
    #[serde(deserialize_with = "deserialize_pricing")]
    pub pricing: PricingTable,
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 60,
            min_prompt_chars: 10,
            pricing: PricingTable::default(),
            api_key: None,
        }
    }
}

fn deserialize_pricing<'de, D>(deserializer: D) -> Result<PricingTable, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = PricingTable::deserialize(deserializer)?;
    let mut table = PricingTable::default();
    table.merge(overrides);
    Ok(table)
}

impl OptimizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(key));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError(format!(
                "unsupported config version {} (supported: {})",
                self.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError("model must not be empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError("max_tokens must be greater than 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError("timeout_secs must be greater than 0".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError(format!(
                "temperature {} out of range [0, 2]",
                self.temperature
            )));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<OptimizerConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<OptimizerConfig, ConfigError> {
    let cfg: OptimizerConfig = serde_yaml::from_str(raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, crate::templates::SAMPLE_CONFIG)
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// USD per 1000 tokens, split by direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRates {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl ModelRates {
    pub const fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    pub fn cost_usd(&self, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        f64::from(prompt_tokens) / 1000.0 * self.input_per_1k
            + f64::from(completion_tokens) / 1000.0 * self.output_per_1k
    }
}

/// Static model → rates lookup. Entries from the config file override defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable {
    models: BTreeMap<String, ModelRates>,
}

impl Default for PricingTable {
    fn default() -> Self {
        let models = [
            ("gpt-4o-mini", ModelRates::new(0.00015, 0.0006)),
            ("gpt-4o", ModelRates::new(0.0025, 0.01)),
            ("gpt-4.1-mini", ModelRates::new(0.0004, 0.0016)),
            ("gpt-3.5-turbo", ModelRates::new(0.0005, 0.0015)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self { models }
    }
}

impl PricingTable {
    pub fn empty() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, rates: ModelRates) -> Self {
        self.models.insert(model.into(), rates);
        self
    }

    pub fn rates_for(&self, model: &str) -> Option<ModelRates> {
        self.models.get(model).copied()
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelRates)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of this table.
    pub fn merge(&mut self, other: PricingTable) {
        self.models.extend(other.models);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_uses_per_thousand_rates() {
        let rates = ModelRates::new(0.0005, 0.0015);
        let cost = rates.cost_usd(100, 200);
        assert!((cost - 0.00035).abs() < 1e-12, "got {}", cost);
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        assert_eq!(ModelRates::new(1.0, 1.0).cost_usd(0, 0), 0.0);
    }

    #[test]
    fn default_table_knows_mini_model() {
        let table = PricingTable::default();
        assert_eq!(
            table.rates_for("gpt-4o-mini"),
            Some(ModelRates::new(0.00015, 0.0006))
        );
        assert!(table.rates_for("unknown-model").is_none());
    }

    #[test]
    fn merge_overrides_and_extends() {
        let mut table = PricingTable::default();
        table.merge(
            PricingTable::empty()
                .with_model("gpt-4o-mini", ModelRates::new(1.0, 2.0))
                .with_model("local-llama", ModelRates::new(0.0, 0.0)),
        );
        assert_eq!(
            table.rates_for("gpt-4o-mini"),
            Some(ModelRates::new(1.0, 2.0))
        );
        assert!(table.rates_for("local-llama").is_some());
        assert!(table.rates_for("gpt-4o").is_some());
    }
}

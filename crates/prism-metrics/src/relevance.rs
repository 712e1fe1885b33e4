use prism_core::metrics_api::{Dimension, Metric, MetricResult};
use std::collections::BTreeSet;

use crate::text::{keywords, tokens};

const FLOOR: f64 = 3.0;
const SPAN: f64 = 7.0;
const NEUTRAL: f64 = 8.5;

/// Share of the prompt's content words that the completion mentions.
pub struct RelevanceMetric;

impl Metric for RelevanceMetric {
    fn name(&self) -> &'static str {
        "relevance"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Relevance
    }

    fn evaluate(&self, prompt: &str, completion: &str) -> anyhow::Result<MetricResult> {
        let wanted = keywords(prompt);
        if wanted.is_empty() {
            return Ok(MetricResult::new(NEUTRAL)
                .with_details(serde_json::json!({ "keywords": 0 })));
        }

        let seen: BTreeSet<String> = tokens(completion).collect();
        let hits = wanted.iter().filter(|k| seen.contains(*k)).count();
        let coverage = hits as f64 / wanted.len() as f64;

        Ok(MetricResult::new(FLOOR + SPAN * coverage).with_details(serde_json::json!({
            "keywords": wanted.len(),
            "matched": hits,
            "coverage": coverage,
        })))
    }
}

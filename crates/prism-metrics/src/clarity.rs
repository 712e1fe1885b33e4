use anyhow::anyhow;
use prism_core::metrics_api::{Dimension, Metric, MetricResult};
use regex::Regex;
use std::sync::OnceLock;

use crate::text::clamp10;

const INDICATORS: &[&str] = &["first", "second", "example", ":", "-", "1.", "2."];
const BASE: f64 = 6.0;
const PER_INDICATOR: f64 = 0.8;

static HEADING: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static BULLET: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn pattern(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    src: &str,
) -> anyhow::Result<&'static Regex> {
    cell.get_or_init(|| Regex::new(src))
        .as_ref()
        .map_err(|e| anyhow!("invalid structure pattern: {}", e))
}

/// Counts distinct structure signals: ordinal words, list markers, headings.
pub struct ClarityMetric;

impl Metric for ClarityMetric {
    fn name(&self) -> &'static str {
        "clarity"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Clarity
    }

    fn evaluate(&self, _prompt: &str, completion: &str) -> anyhow::Result<MetricResult> {
        let lower = completion.to_lowercase();
        let mut found: Vec<&str> = INDICATORS
            .iter()
            .copied()
            .filter(|i| lower.contains(i))
            .collect();

        if pattern(&HEADING, r"(?m)^\s{0,3}#{1,6}\s+\S")?.is_match(completion) {
            found.push("heading");
        }
        if pattern(&BULLET, r"(?m)^\s*[*•]\s+\S")?.is_match(completion) {
            found.push("bullet");
        }

        let score = clamp10(BASE + PER_INDICATOR * found.len() as f64);
        Ok(MetricResult::new(score).with_details(serde_json::json!({ "indicators": found })))
    }
}

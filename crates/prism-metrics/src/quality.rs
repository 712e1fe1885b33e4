use prism_core::metrics_api::{Dimension, Metric, MetricResult};

use crate::text::word_count;

const TARGET_MIN_WORDS: usize = 50;
const TARGET_MAX_WORDS: usize = 300;

/// Rewards completions whose length falls in a useful band.
pub struct QualityMetric;

impl Metric for QualityMetric {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Quality
    }

    fn evaluate(&self, _prompt: &str, completion: &str) -> anyhow::Result<MetricResult> {
        let words = word_count(completion);
        let (score, band) = if words < TARGET_MIN_WORDS {
            (6.0, "short")
        } else if words <= TARGET_MAX_WORDS {
            (9.0, "target")
        } else {
            (7.5, "long")
        };
        Ok(MetricResult::new(score).with_details(serde_json::json!({
            "words": words,
            "band": band,
        })))
    }
}

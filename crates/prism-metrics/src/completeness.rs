use prism_core::metrics_api::{Dimension, Metric, MetricResult};

use crate::text::{clamp10, word_count};

const HEDGES: &[&str] = &[
    "i'm not sure",
    "i am not sure",
    "i cannot",
    "i can't",
    "as an ai",
    "unable to",
];
const HEDGE_PENALTY: f64 = 1.5;
const UNTERMINATED_PENALTY: f64 = 1.0;
const TERMINALS: &[char] = &['.', '!', '?', '"', '\'', ')', ']', '`', '*'];

/// Length relative to the prompt, penalized for hedging and cut-off endings.
pub struct CompletenessMetric;

impl Metric for CompletenessMetric {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Completeness
    }

    fn evaluate(&self, prompt: &str, completion: &str) -> anyhow::Result<MetricResult> {
        let prompt_words = word_count(prompt).max(10);
        let ratio = word_count(completion) as f64 / prompt_words as f64;
        let base = (5.0 + ratio * 2.0).min(10.0);

        let lower = completion.to_lowercase();
        let trimmed = lower.trim_end();
        let mut hedges: Vec<&str> = HEDGES.iter().copied().filter(|h| lower.contains(h)).collect();
        if trimmed.ends_with("...") || trimmed.ends_with('…') {
            hedges.push("...");
        }
        let terminated = trimmed.ends_with(TERMINALS) && !trimmed.ends_with("...");

        let mut score = base - HEDGE_PENALTY * hedges.len() as f64;
        if !terminated {
            score -= UNTERMINATED_PENALTY;
        }

        Ok(MetricResult::new(clamp10(score)).with_details(serde_json::json!({
            "ratio": ratio,
            "hedges": hedges,
            "terminated": terminated,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_against_at_least_ten_prompt_words() {
        // 10 completion words over max(3, 10) prompt words: 5 + 2 * 1.0
        let r = CompletenessMetric
            .evaluate("short prompt here", "a b c d e f g h i j.")
            .unwrap();
        assert!((r.score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn caps_before_penalties() {
        let long = format!("{} done.", vec!["word"; 200].join(" "));
        let r = CompletenessMetric.evaluate("p", &long).unwrap();
        assert_eq!(r.score, 10.0);

        let hedged = format!("As an AI I'm not sure. {} done.", vec!["word"; 200].join(" "));
        let r = CompletenessMetric.evaluate("p", &hedged).unwrap();
        assert!((r.score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn trailing_ellipsis_is_hedge_and_unterminated() {
        let text = format!("{} and so on...", vec!["word"; 100].join(" "));
        let r = CompletenessMetric.evaluate("p", &text).unwrap();
        // 10 - 1.5 - 1.0
        assert!((r.score - 7.5).abs() < 1e-9);
        assert_eq!(r.details["terminated"], false);
    }

    #[test]
    fn never_negative() {
        let r = CompletenessMetric
            .evaluate(&vec!["w"; 500].join(" "), "I cannot. I can't. As an AI unable to, i'm not sure")
            .unwrap();
        assert_eq!(r.score, 0.0);
    }
}

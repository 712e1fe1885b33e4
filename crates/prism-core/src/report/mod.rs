pub mod console;
pub mod json;
pub mod markdown;
pub mod progress;

use crate::model::{RunResult, Technique};
use serde::{Deserialize, Serialize};

/// Headline numbers shared by every report format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub variants: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_tokens: u64,
    pub total_cost_usd: f64,
    pub total_latency_seconds: f64,
    pub best: Option<Technique>,
    pub best_aggregate: Option<f64>,
}

impl RunSummary {
    pub fn from_result(result: &RunResult) -> Self {
        let best = result.best();
        Self {
            variants: result.outcomes.len(),
            succeeded: result.succeeded_count(),
            failed: result.failed_count(),
            total_tokens: result.total_tokens(),
            total_cost_usd: result.total_cost_usd,
            total_latency_seconds: result.total_latency_seconds,
            best: best.map(|o| o.technique()),
            best_aggregate: best.and_then(|o| o.aggregate()),
        }
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut with "...".
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
    }
}

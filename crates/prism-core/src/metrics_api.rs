use serde::{Deserialize, Serialize};

/// The four heuristic axes a completion is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Quality,
    Clarity,
    Completeness,
    Relevance,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Quality,
        Dimension::Clarity,
        Dimension::Completeness,
        Dimension::Relevance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Quality => "quality",
            Dimension::Clarity => "clarity",
            Dimension::Completeness => "completeness",
            Dimension::Relevance => "relevance",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricResult {
    pub score: f64,
    pub details: serde_json::Value,
}

impl MetricResult {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            details: serde_json::json!({}),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// A deterministic, side-effect free measurement of a completion on 0..=10.
pub trait Metric: Send + Sync {
    fn name(&self) -> &'static str;
    fn dimension(&self) -> Dimension;
    fn evaluate(&self, prompt: &str, completion: &str) -> anyhow::Result<MetricResult>;
}

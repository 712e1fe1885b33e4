use std::sync::Arc;

use prism_core::metrics_api::Metric;

mod clarity;
mod completeness;
mod quality;
mod relevance;
mod text;

pub use clarity::ClarityMetric;
pub use completeness::CompletenessMetric;
pub use quality::QualityMetric;
pub use relevance::RelevanceMetric;

/// One metric per dimension, in dimension order.
pub fn default_metrics() -> Vec<Arc<dyn Metric>> {
    vec![
        Arc::new(QualityMetric),
        Arc::new(ClarityMetric),
        Arc::new(CompletenessMetric),
        Arc::new(RelevanceMetric),
    ]
}

use crate::errors::ConfigError;
use crate::metrics_api::{Dimension, Metric};
use crate::model::ScoreRecord;
use std::sync::Arc;

/// Combines one metric per [`Dimension`] into a [`ScoreRecord`].
#[derive(Clone)]
pub struct Scorer {
    // Indexed in `Dimension::ALL` order.
    metrics: [Arc<dyn Metric>; 4],
}

impl Scorer {
    pub fn new(metrics: Vec<Arc<dyn Metric>>) -> Result<Self, ConfigError> {
        let mut slots: [Option<Arc<dyn Metric>>; 4] = [None, None, None, None];
        for metric in metrics {
            let idx = dimension_index(metric.dimension());
            if let Some(existing) = &slots[idx] {
                return Err(ConfigError(format!(
                    "metrics '{}' and '{}' both score {}",
                    existing.name(),
                    metric.name(),
                    metric.dimension().as_str()
                )));
            }
            slots[idx] = Some(metric);
        }
        let [quality, clarity, completeness, relevance] = slots;
        let missing = |d: Dimension| ConfigError(format!("no metric for {}", d.as_str()));
        Ok(Self {
            metrics: [
                quality.ok_or_else(|| missing(Dimension::Quality))?,
                clarity.ok_or_else(|| missing(Dimension::Clarity))?,
                completeness.ok_or_else(|| missing(Dimension::Completeness))?,
                relevance.ok_or_else(|| missing(Dimension::Relevance))?,
            ],
        })
    }

    pub fn metric_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Never fails: unmeasurable completions score zero with a note.
    pub fn score(&self, prompt: &str, completion: &str) -> ScoreRecord {
        if completion.trim().is_empty() {
            return ScoreRecord::zeroed("scoring error: empty completion");
        }

        let mut values = [0.0_f64; 4];
        for (slot, metric) in values.iter_mut().zip(self.metrics.iter()) {
            match metric.evaluate(prompt, completion) {
                Ok(result) if result.score.is_finite() => *slot = result.score,
                Ok(result) => {
                    tracing::warn!(metric = metric.name(), score = result.score, "non-finite metric score");
                    return ScoreRecord::zeroed(format!(
                        "scoring error: {} produced a non-finite score",
                        metric.name()
                    ));
                }
                Err(e) => {
                    tracing::warn!(metric = metric.name(), error = %e, "metric failed");
                    return ScoreRecord::zeroed(format!(
                        "scoring error: {} failed: {}",
                        metric.name(),
                        e
                    ));
                }
            }
        }

        let [quality, clarity, completeness, relevance] = values;
        ScoreRecord::from_sub_scores(quality, clarity, completeness, relevance)
    }
}

fn dimension_index(d: Dimension) -> usize {
    match d {
        Dimension::Quality => 0,
        Dimension::Clarity => 1,
        Dimension::Completeness => 2,
        Dimension::Relevance => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics_api::MetricResult;

    struct Fixed(Dimension, f64);

    impl Metric for Fixed {
        fn name(&self) -> &'static str {
            self.0.as_str()
        }
        fn dimension(&self) -> Dimension {
            self.0
        }
        fn evaluate(&self, _prompt: &str, _completion: &str) -> anyhow::Result<MetricResult> {
            Ok(MetricResult::new(self.1))
        }
    }

    struct Broken;

    impl Metric for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn dimension(&self) -> Dimension {
            Dimension::Relevance
        }
        fn evaluate(&self, _prompt: &str, _completion: &str) -> anyhow::Result<MetricResult> {
            anyhow::bail!("cannot tokenize")
        }
    }

    fn fixed(values: [f64; 4]) -> Vec<Arc<dyn Metric>> {
        Dimension::ALL
            .iter()
            .zip(values)
            .map(|(d, v)| Arc::new(Fixed(*d, v)) as Arc<dyn Metric>)
            .collect()
    }

    #[test]
    fn aggregate_is_mean_of_clamped_sub_scores() {
        let scorer = Scorer::new(fixed([8.0, 14.0, 6.0, -1.0])).unwrap();
        let s = scorer.score("p", "some text");
        assert_eq!((s.quality, s.clarity, s.completeness, s.relevance), (8.0, 10.0, 6.0, 0.0));
        assert!((s.aggregate - 6.0).abs() < 1e-9);
        assert!(s.note.is_none());
    }

    #[test]
    fn empty_completion_scores_zero_with_note() {
        let scorer = Scorer::new(fixed([8.0; 4])).unwrap();
        let s = scorer.score("p", "   \n");
        assert_eq!(s.aggregate, 0.0);
        assert!(s.note.unwrap().contains("empty completion"));
    }

    #[test]
    fn failing_or_nan_metric_zeroes_record() {
        let mut metrics = fixed([8.0; 4]);
        metrics.pop();
        metrics.push(Arc::new(Broken));
        let s = Scorer::new(metrics).unwrap().score("p", "text");
        assert_eq!(s.aggregate, 0.0);
        assert!(s.note.unwrap().contains("broken failed: cannot tokenize"));

        let s = Scorer::new(fixed([8.0, f64::NAN, 8.0, 8.0]))
            .unwrap()
            .score("p", "text");
        assert_eq!(s.clarity, 0.0);
        assert!(s.note.unwrap().contains("non-finite"));
    }

    #[test]
    fn requires_exactly_one_metric_per_dimension() {
        let mut metrics = fixed([1.0; 4]);
        metrics.pop();
        let err = Scorer::new(metrics).err().unwrap();
        assert!(err.to_string().contains("no metric for relevance"));

        let mut metrics = fixed([1.0; 4]);
        metrics.push(Arc::new(Fixed(Dimension::Quality, 2.0)));
        let err = Scorer::new(metrics).err().unwrap();
        assert!(err.to_string().contains("both score quality"));
    }
}

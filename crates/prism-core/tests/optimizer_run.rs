//! Orchestrator behaviour end to end with the in-process fake client.

use prism_core::config::OptimizerConfig;
use prism_core::engine::Optimizer;
use prism_core::errors::{RunError, RunErrorKind};
use prism_core::metrics_api::{Dimension, Metric, MetricResult};
use prism_core::model::{OutcomeStatus, Technique};
use prism_core::providers::llm::fake::FakeClient;
use prism_core::providers::llm::tracing::TracingLlmClient;
use prism_core::providers::llm::LlmClient;
use prism_core::scoring::Scorer;
use std::sync::Arc;
use std::time::Duration;

const PROMPT: &str = "Write a blog post about AI";

/// Scores by completion length in words, capped at 10.
struct WordCount(Dimension);

impl Metric for WordCount {
    fn name(&self) -> &'static str {
        "word_count"
    }
    fn dimension(&self) -> Dimension {
        self.0
    }
    fn evaluate(&self, _prompt: &str, completion: &str) -> anyhow::Result<MetricResult> {
        Ok(MetricResult::new(completion.split_whitespace().count() as f64))
    }
}

fn scorer() -> Scorer {
    Scorer::new(
        Dimension::ALL
            .iter()
            .map(|d| Arc::new(WordCount(*d)) as Arc<dyn Metric>)
            .collect(),
    )
    .unwrap()
}

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

#[tokio::test]
async fn generation_only_produces_untested_outcomes() {
    let opt = Optimizer::new(OptimizerConfig::default(), None, scorer());
    let result = opt.run(PROMPT, false).await.unwrap();

    assert!(!result.tested);
    assert_eq!(result.outcomes.len(), 5);
    for (o, t) in result.outcomes.iter().zip(Technique::ALL) {
        assert_eq!(o.technique(), t);
        assert_eq!(o.status(), OutcomeStatus::Untested);
    }
    assert_eq!(result.total_cost_usd, 0.0);
    assert_eq!(result.total_latency_seconds, 0.0);
    assert_eq!(result.ranking, Technique::ALL.to_vec());
    assert!(result.best().is_none());
    assert!(uuid::Uuid::parse_str(&result.run_id).is_ok());
}

#[tokio::test]
async fn any_non_empty_prompt_is_accepted() {
    let opt = Optimizer::new(OptimizerConfig::default(), None, scorer());
    let result = opt.run("Hi there", false).await.unwrap();

    assert_eq!(result.outcomes.len(), 5);
    assert!(result
        .outcomes
        .iter()
        .all(|o| o.status() == OutcomeStatus::Untested));
    assert!(result.outcomes[4].variant.text.starts_with("Hi there"));
}

#[tokio::test]
async fn one_failed_call_is_recorded_and_the_run_continues() {
    let client = Arc::new(
        FakeClient::new("gpt-4o-mini")
            .with_response("A short but complete answer.")
            .fail_when(
                "step-by-step",
                RunError::provider_server(500, "openai", "upstream exploded"),
            )
            .with_usage(100, 200)
            .with_latency(Duration::from_millis(250)),
    );
    let opt = Optimizer::new(OptimizerConfig::default(), Some(client.clone() as Arc<dyn LlmClient>), scorer());
    let result = opt.run(PROMPT, true).await.unwrap();

    assert_eq!(client.prompts().len(), 5);
    assert_eq!(result.outcomes.len(), 5);
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.succeeded_count(), 4);

    let failed = result.outcome(Technique::ChainOfThought).unwrap();
    let err = failed.error.as_ref().unwrap();
    assert_eq!(err.kind, RunErrorKind::ProviderServer);
    assert_eq!(err.status, Some(500));
    assert!(failed.completion.is_none() && failed.score.is_none());

    // gpt-4o-mini: 100/1000 * 0.00015 + 200/1000 * 0.0006 = 0.000135 per call.
    assert!((result.total_cost_usd - 4.0 * 0.000135).abs() < 1e-12);
    assert!((result.total_latency_seconds - 1.0).abs() < 1e-9);
    assert_eq!(result.total_tokens(), 4 * 300);
    assert_eq!(*result.ranking.last().unwrap(), Technique::ChainOfThought);
}

#[tokio::test]
async fn ranking_orders_by_aggregate_with_stable_ties() {
    let client: Arc<dyn LlmClient> = Arc::new(TracingLlmClient::new(Arc::new(
        FakeClient::new("gpt-4o-mini")
            .respond_when("Example 1:", words(7))
            .respond_when("step-by-step", words(9))
            .respond_when("structured format", words(9))
            .respond_when("You are an expert professional", words(5))
            .respond_when("Be direct and concise", words(8)),
    )));
    let opt = Optimizer::new(OptimizerConfig::default(), Some(client), scorer());
    let result = opt.run(PROMPT, true).await.unwrap();

    assert_eq!(
        result.ranking,
        vec![
            Technique::ChainOfThought,
            Technique::StructuredOutput,
            Technique::Concise,
            Technique::FewShot,
            Technique::RoleBased,
        ]
    );
    // Canonical order is untouched by ranking.
    let canonical: Vec<_> = result.outcomes.iter().map(|o| o.technique()).collect();
    assert_eq!(canonical, Technique::ALL.to_vec());
    assert_eq!(result.best().unwrap().technique(), Technique::ChainOfThought);
}

#[tokio::test]
async fn empty_completion_scores_zero_but_still_counts_cost() {
    let client = Arc::new(
        FakeClient::new("gpt-4o-mini")
            .with_response("")
            .with_usage(10, 0),
    );
    let opt = Optimizer::new(OptimizerConfig::default(), Some(client as Arc<dyn LlmClient>), scorer());
    let result = opt.run(PROMPT, true).await.unwrap();

    assert_eq!(result.failed_count(), 0);
    for o in &result.outcomes {
        let s = o.score.as_ref().unwrap();
        assert_eq!(s.aggregate, 0.0);
        assert!(s.note.as_deref().unwrap().contains("empty completion"));
    }
    assert!(result.total_cost_usd > 0.0);
}

#[tokio::test]
async fn test_mode_validation_happens_before_any_call() {
    let client = Arc::new(FakeClient::new("gpt-4o-mini"));
    let opt = Optimizer::new(OptimizerConfig::default(), Some(client.clone() as Arc<dyn LlmClient>), scorer());

    let err = opt.run(" \n\t ", true).await.unwrap_err();
    assert_eq!(err.kind, RunErrorKind::InvalidInput);
    assert!(err.to_string().contains("empty prompt"));

    let opt = Optimizer::new(OptimizerConfig::default(), None, scorer());
    let err = opt.run(PROMPT, true).await.unwrap_err();
    assert_eq!(err.kind, RunErrorKind::MissingConfig);

    assert!(client.prompts().is_empty());
}

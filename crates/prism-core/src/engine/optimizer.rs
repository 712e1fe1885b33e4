use crate::config::OptimizerConfig;
use crate::errors::RunError;
use crate::model::{rank_outcomes, CompletionResult, RunResult, Variant, VariantOutcome};
use crate::pricing::ModelRates;
use crate::providers::llm::{LlmClient, LlmRequest};
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::scoring::Scorer;
use crate::variants::generate_variants;
use std::sync::Arc;

/// Generates the variants for a prompt and, in test mode, completes and
/// scores each one against the configured model.
pub struct Optimizer {
    pub config: OptimizerConfig,
    pub client: Option<Arc<dyn LlmClient>>,
    pub scorer: Scorer,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig, client: Option<Arc<dyn LlmClient>>, scorer: Scorer) -> Self {
        Self {
            config,
            client,
            scorer,
        }
    }

    pub async fn run(&self, base_prompt: &str, test: bool) -> Result<RunResult, RunError> {
        self.run_with_progress(base_prompt, test, None).await
    }

    /// Like [`Optimizer::run`]; `progress` is called once per variant after it
    /// has been completed and scored (or has failed).
    pub async fn run_with_progress(
        &self,
        base_prompt: &str,
        test: bool,
        progress: Option<ProgressSink>,
    ) -> Result<RunResult, RunError> {
        if base_prompt.trim().is_empty() {
            return Err(RunError::invalid_input("empty prompt"));
        }
        let variants = generate_variants(base_prompt)?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        tracing::info!(run_id = %run_id, model = %self.config.model, test, "optimizer run started");
        tracing::debug!(metrics = ?self.scorer.metric_names(), "scoring with");

        let mut result = RunResult {
            run_id,
            created_at,
            base_prompt: base_prompt.to_string(),
            model: self.config.model.clone(),
            tested: test,
            outcomes: Vec::with_capacity(variants.len()),
            total_cost_usd: 0.0,
            total_latency_seconds: 0.0,
            ranking: Vec::new(),
        };

        if !test {
            result.outcomes = variants.into_iter().map(VariantOutcome::untested).collect();
            result.ranking = rank_outcomes(&result.outcomes);
            tracing::info!(run_id = %result.run_id, "variants generated; evaluation skipped");
            return Ok(result);
        }

        let client = self.client.as_ref().ok_or_else(|| {
            RunError::missing_config("testing variants requires a completion client (set OPENAI_API_KEY)")
        })?;
        let rates = self.config.pricing.rates_for(&self.config.model).ok_or_else(|| {
            let known: Vec<&str> = self.config.pricing.models().map(|(m, _)| m).collect();
            RunError::config_parse(format!(
                "no pricing configured for model '{}' (known: {})",
                self.config.model,
                known.join(", ")
            ))
        })?;

        let total = variants.len();
        for (i, variant) in variants.into_iter().enumerate() {
            let technique = variant.technique;
            tracing::debug!(technique = technique.slug(), "testing variant");

            let outcome = self.test_variant(client.as_ref(), rates, base_prompt, variant).await;
            match (&outcome.completion, &outcome.error) {
                (Some(c), _) => {
                    result.total_cost_usd += c.cost_usd;
                    result.total_latency_seconds += c.latency_seconds;
                }
                (None, Some(e)) => {
                    tracing::warn!(
                        technique = technique.slug(),
                        kind = e.kind.as_str(),
                        error = %e,
                        "variant failed"
                    );
                }
                (None, None) => {}
            }
            result.outcomes.push(outcome);

            if let Some(sink) = &progress {
                sink(ProgressEvent {
                    done: i + 1,
                    total,
                    technique,
                });
            }
        }

        result.ranking = rank_outcomes(&result.outcomes);
        tracing::info!(
            run_id = %result.run_id,
            succeeded = result.succeeded_count(),
            failed = result.failed_count(),
            total_cost_usd = result.total_cost_usd,
            "optimizer run finished"
        );
        Ok(result)
    }

    async fn test_variant(
        &self,
        client: &dyn LlmClient,
        rates: ModelRates,
        base_prompt: &str,
        variant: Variant,
    ) -> VariantOutcome {
        let request = LlmRequest {
            prompt: variant.text.clone(),
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        match client.complete(&request).await {
            Ok(resp) => {
                let completion = CompletionResult {
                    cost_usd: rates.cost_usd(resp.prompt_tokens, resp.completion_tokens),
                    latency_seconds: resp.latency.as_secs_f64(),
                    prompt_tokens: resp.prompt_tokens,
                    completion_tokens: resp.completion_tokens,
                    model: resp.model,
                    completion_text: resp.text,
                };
                // Scored against the user's prompt so template wording does not
                // count toward relevance.
                let score = self.scorer.score(base_prompt, &completion.completion_text);
                VariantOutcome::succeeded(variant, completion, score)
            }
            Err(e) => VariantOutcome::failed(variant, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RunErrorKind;
    use crate::metrics_api::{Dimension, Metric, MetricResult};
    use crate::model::Technique;
    use crate::providers::llm::fake::FakeClient;
    use std::sync::Mutex;

    struct Constant(Dimension);

    impl Metric for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }
        fn dimension(&self) -> Dimension {
            self.0
        }
        fn evaluate(&self, _prompt: &str, _completion: &str) -> anyhow::Result<MetricResult> {
            Ok(MetricResult::new(5.0))
        }
    }

    fn scorer() -> Scorer {
        Scorer::new(
            Dimension::ALL
                .iter()
                .map(|d| Arc::new(Constant(*d)) as Arc<dyn Metric>)
                .collect(),
        )
        .unwrap()
    }

    /// Records every prompt handed to the scorer.
    struct SeenPrompts(Dimension, Arc<Mutex<Vec<String>>>);

    impl Metric for SeenPrompts {
        fn name(&self) -> &'static str {
            "seen_prompts"
        }
        fn dimension(&self) -> Dimension {
            self.0
        }
        fn evaluate(&self, prompt: &str, _completion: &str) -> anyhow::Result<MetricResult> {
            self.1.lock().unwrap().push(prompt.to_string());
            Ok(MetricResult::new(5.0))
        }
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_before_any_call() {
        let client = Arc::new(FakeClient::new("gpt-4o-mini"));
        let opt = Optimizer::new(OptimizerConfig::default(), Some(client.clone() as Arc<dyn LlmClient>), scorer());
        let err = opt.run("   ", true).await.unwrap_err();
        assert_eq!(err.kind, RunErrorKind::InvalidInput);
        assert!(client.prompts().is_empty());

        let err = opt.run("", false).await.unwrap_err();
        assert_eq!(err.kind, RunErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn short_prompt_still_yields_all_variants() {
        let opt = Optimizer::new(OptimizerConfig::default(), None, scorer());
        let result = opt.run("Hi there", false).await.unwrap();
        assert_eq!(result.outcomes.len(), 5);
        assert!(result.outcomes.iter().all(|o| o.completion.is_none()));
    }

    #[tokio::test]
    async fn completions_are_scored_against_the_base_prompt() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let scorer = Scorer::new(
            Dimension::ALL
                .iter()
                .map(|d| Arc::new(SeenPrompts(*d, seen.clone())) as Arc<dyn Metric>)
                .collect(),
        )
        .unwrap();
        let client = Arc::new(FakeClient::new("gpt-4o-mini").with_response("An answer."));
        let opt = Optimizer::new(OptimizerConfig::default(), Some(client.clone() as Arc<dyn LlmClient>), scorer);
        opt.run("Describe ocean currents", true).await.unwrap();

        // The client saw the templated variants; the metrics saw only the base prompt.
        assert!(client.prompts().iter().any(|p| p.contains("Example 1:")));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5 * 4);
        assert!(seen.iter().all(|p| p == "Describe ocean currents"));
    }

    #[tokio::test]
    async fn test_mode_without_client_is_missing_config() {
        let opt = Optimizer::new(OptimizerConfig::default(), None, scorer());
        let err = opt.run("Write a blog post about AI", true).await.unwrap_err();
        assert_eq!(err.kind, RunErrorKind::MissingConfig);
    }

    #[tokio::test]
    async fn unpriced_model_fails_before_any_call() {
        let client = Arc::new(FakeClient::new("local"));
        let cfg = OptimizerConfig {
            model: "local-llama".into(),
            ..OptimizerConfig::default()
        };
        let opt = Optimizer::new(cfg, Some(client.clone() as Arc<dyn LlmClient>), scorer());
        let err = opt.run("Write a blog post about AI", true).await.unwrap_err();
        assert_eq!(err.kind, RunErrorKind::ConfigParse);
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn progress_reports_each_variant_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: ProgressSink = Arc::new(move |ev: ProgressEvent| {
            sink_seen.lock().unwrap().push((ev.done, ev.total, ev.technique));
        });

        let client = Arc::new(FakeClient::new("gpt-4o-mini").with_response("An answer."));
        let opt = Optimizer::new(OptimizerConfig::default(), Some(client as Arc<dyn LlmClient>), scorer());
        opt.run_with_progress("Write a blog post about AI", true, Some(sink))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], (1, 5, Technique::FewShot));
        assert_eq!(seen[4], (5, 5, Technique::Concise));
    }
}

//! Run data: techniques, variants, per-variant outcomes and the ranked run.
//!
//! `outcomes` always stay in canonical technique order; `ranking` carries the
//! score order.

use crate::errors::RunError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The prompt-engineering transformations, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    FewShot,
    ChainOfThought,
    StructuredOutput,
    RoleBased,
    Concise,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::FewShot,
        Technique::ChainOfThought,
        Technique::StructuredOutput,
        Technique::RoleBased,
        Technique::Concise,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Technique::FewShot => "few_shot",
            Technique::ChainOfThought => "chain_of_thought",
            Technique::StructuredOutput => "structured_output",
            Technique::RoleBased => "role_based",
            Technique::Concise => "concise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Technique::FewShot => "Few Shot",
            Technique::ChainOfThought => "Chain Of Thought",
            Technique::StructuredOutput => "Structured Output",
            Technique::RoleBased => "Role Based",
            Technique::Concise => "Concise",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Technique::FewShot => "Provides examples to guide the model's response pattern",
            Technique::ChainOfThought => "Encourages step-by-step reasoning before answering",
            Technique::StructuredOutput => "Requests organized, formatted responses",
            Technique::RoleBased => "Assigns expert persona for authoritative answers",
            Technique::Concise => "Optimizes for brevity and directness",
        }
    }

    /// Position in [`Technique::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Technique {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub technique: Technique,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub completion_text: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub latency_seconds: f64,
    pub cost_usd: f64,
}

impl CompletionResult {
    pub fn total_tokens(&self) -> u64 {
        u64::from(self.prompt_tokens) + u64::from(self.completion_tokens)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub quality: f64,
    pub clarity: f64,
    pub completeness: f64,
    pub relevance: f64,
    pub aggregate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ScoreRecord {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Clamp each sub-score to [0, 10] and derive the aggregate as their mean.
    pub fn from_sub_scores(quality: f64, clarity: f64, completeness: f64, relevance: f64) -> Self {
        let quality = clamp_score(quality);
        let clarity = clamp_score(clarity);
        let completeness = clamp_score(completeness);
        let relevance = clamp_score(relevance);
        Self {
            quality,
            clarity,
            completeness,
            relevance,
            aggregate: (quality + clarity + completeness + relevance) / 4.0,
            note: None,
        }
    }

    /// All sub-scores zero; used when a completion cannot be measured.
    pub fn zeroed(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::from_sub_scores(0.0, 0.0, 0.0, 0.0)
        }
    }
}

fn clamp_score(v: f64) -> f64 {
    if v.is_nan() {
        return ScoreRecord::MIN;
    }
    v.clamp(ScoreRecord::MIN, ScoreRecord::MAX)
}

/// One row of a run: the variant plus whatever testing produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOutcome {
    pub variant: Variant,
    pub completion: Option<CompletionResult>,
    pub score: Option<ScoreRecord>,
    pub error: Option<RunError>,
}

impl VariantOutcome {
    pub fn untested(variant: Variant) -> Self {
        Self {
            variant,
            completion: None,
            score: None,
            error: None,
        }
    }

    pub fn succeeded(variant: Variant, completion: CompletionResult, score: ScoreRecord) -> Self {
        Self {
            variant,
            completion: Some(completion),
            score: Some(score),
            error: None,
        }
    }

    pub fn failed(variant: Variant, error: RunError) -> Self {
        Self {
            variant,
            completion: None,
            score: None,
            error: Some(error),
        }
    }

    pub fn technique(&self) -> Technique {
        self.variant.technique
    }

    pub fn aggregate(&self) -> Option<f64> {
        self.score.as_ref().map(|s| s.aggregate)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn status(&self) -> OutcomeStatus {
        match (&self.completion, &self.error) {
            (_, Some(_)) => OutcomeStatus::Error,
            (Some(_), None) => OutcomeStatus::Scored,
            (None, None) => OutcomeStatus::Untested,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Untested,
    Scored,
    Error,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Untested => "untested",
            OutcomeStatus::Scored => "ok",
            OutcomeStatus::Error => "error",
        }
    }
}

/// Full output of one optimize-and-evaluate invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub created_at: String,
    pub base_prompt: String,
    pub model: String,
    pub tested: bool,
    /// Canonical order: always [`Technique::ALL`].
    pub outcomes: Vec<VariantOutcome>,
    pub total_cost_usd: f64,
    pub total_latency_seconds: f64,
    /// Presentation order: aggregate descending, ties and unscored rows keep canonical order.
    pub ranking: Vec<Technique>,
}

impl RunResult {
    pub fn outcome(&self, technique: Technique) -> Option<&VariantOutcome> {
        self.outcomes.iter().find(|o| o.technique() == technique)
    }

    pub fn ranked(&self) -> Vec<&VariantOutcome> {
        self.ranking
            .iter()
            .filter_map(|t| self.outcome(*t))
            .collect()
    }

    /// Highest-scoring outcome, if anything was scored.
    pub fn best(&self) -> Option<&VariantOutcome> {
        self.ranked().into_iter().find(|o| o.score.is_some())
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.completion.is_some())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_error()).count()
    }

    pub fn total_tokens(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(|o| o.completion.as_ref())
            .map(CompletionResult::total_tokens)
            .sum()
    }
}

/// Stable ranking by aggregate score, descending. Unscored outcomes go last.
pub fn rank_outcomes(outcomes: &[VariantOutcome]) -> Vec<Technique> {
    let mut order: Vec<&VariantOutcome> = outcomes.iter().collect();
    order.sort_by(|a, b| match (a.aggregate(), b.aggregate()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    order.into_iter().map(VariantOutcome::technique).collect()
}

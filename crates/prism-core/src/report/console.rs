use crate::errors::diagnostic::diagnose;
use crate::model::{OutcomeStatus, RunResult, Technique};
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::RunSummary;
use std::fmt::Write as _;
use std::sync::Arc;

/// Single progress line, e.g. `Testing variant 2/5 (Chain Of Thought)...`.
#[must_use]
pub fn format_progress_line(done: usize, total: usize, technique: Technique) -> String {
    format!("Testing variant {}/{} ({})...", done, total, technique.label())
}

/// Sink that prints every event to stderr so stdout stays reserved for the report.
pub fn stderr_progress_sink() -> ProgressSink {
    Arc::new(|ev: ProgressEvent| {
        eprintln!("{}", format_progress_line(ev.done, ev.total, ev.technique));
    })
}

pub fn format_variants(result: &RunResult, show_full: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated {} variants:", result.outcomes.len());
    for (i, o) in result.outcomes.iter().enumerate() {
        let t = o.technique();
        let _ = writeln!(out, "  {}. {:<18} {}", i + 1, t.label(), t.description());
        if show_full {
            for line in o.variant.text.lines() {
                let _ = writeln!(out, "       | {}", line);
            }
        }
    }
    out
}

pub fn format_results_table(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<18} {:>5} {:>5} {:>5} {:>5} {:>5} {:>7} {:>10} {:>8}  {}",
        "#", "technique", "agg", "qual", "clar", "comp", "rel", "tokens", "cost", "latency", "status"
    );
    for (rank, o) in result.ranked().into_iter().enumerate() {
        let status = o.status();
        match (&o.score, &o.completion) {
            (Some(s), Some(c)) => {
                let _ = writeln!(
                    out,
                    "{:<4} {:<18} {:>5.2} {:>5.1} {:>5.1} {:>5.1} {:>5.1} {:>7} {:>10.6} {:>7.2}s  {}",
                    rank + 1,
                    o.technique().label(),
                    s.aggregate,
                    s.quality,
                    s.clarity,
                    s.completeness,
                    s.relevance,
                    c.total_tokens(),
                    c.cost_usd,
                    c.latency_seconds,
                    status.as_str()
                );
            }
            _ => {
                let reason = o
                    .error
                    .as_ref()
                    .map(|e| format!(" [{}] {}", e.kind.as_str(), e.message))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<4} {:<18} {:>5} {:>5} {:>5} {:>5} {:>5} {:>7} {:>10} {:>8}  {}{}",
                    "-",
                    o.technique().label(),
                    "-", "-", "-", "-", "-", "-", "-", "-",
                    status.as_str(),
                    reason
                );
            }
        }
        if let Some(note) = o.score.as_ref().and_then(|s| s.note.as_deref()) {
            let _ = writeln!(out, "     note: {}", note);
        }
    }
    out
}

pub fn format_footer(result: &RunResult) -> String {
    let summary = RunSummary::from_result(result);
    let mut out = String::new();
    if !result.tested {
        let _ = writeln!(
            out,
            "Evaluation skipped: {} variants generated, no completions requested.",
            summary.variants
        );
        return out;
    }
    let _ = writeln!(
        out,
        "Summary: {} ok, {} failed | tokens {} | cost ${:.6} | latency {:.2}s",
        summary.succeeded,
        summary.failed,
        summary.total_tokens,
        summary.total_cost_usd,
        summary.total_latency_seconds
    );
    match (summary.best, summary.best_aggregate) {
        (Some(t), Some(score)) => {
            let _ = writeln!(out, "Best variant: {} ({:.2}/10)", t.label(), score);
        }
        _ => {
            let _ = writeln!(out, "Best variant: none (no variant was scored)");
        }
    }
    out
}

/// Fix steps for failed variants, one block per distinct error kind.
pub fn format_failures(result: &RunResult) -> String {
    let mut out = String::new();
    let mut seen = Vec::new();
    for o in &result.outcomes {
        let Some(err) = &o.error else { continue };
        if seen.contains(&err.kind) {
            continue;
        }
        seen.push(err.kind);
        if let Some(diag) = diagnose(err) {
            out.push_str(&diag.format_terminal());
        }
    }
    out
}

pub fn render_text(result: &RunResult, show_prompts: bool) -> String {
    let mut out = format_variants(result, show_prompts);
    out.push('\n');
    if result.tested {
        out.push_str(&format_results_table(result));
        out.push('\n');
    }
    out.push_str(&format_footer(result));
    if result.outcomes.iter().any(|o| o.status() == OutcomeStatus::Error) {
        let failures = format_failures(result);
        if !failures.is_empty() {
            out.push('\n');
            out.push_str(&failures);
        }
    }
    out
}

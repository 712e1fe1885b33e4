use crate::model::{RunResult, VariantOutcome};
use crate::report::{preview, RunSummary};
use std::fmt::Write as _;

const PREVIEW_CHARS: usize = 200;

fn rank_marker(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}.", n),
    }
}

pub fn render_variants(result: &RunResult) -> String {
    let mut out = String::from("## 📝 Generated Prompt Variants\n\n");
    for (i, o) in result.outcomes.iter().enumerate() {
        let t = o.technique();
        let _ = writeln!(out, "### {}. {}", i + 1, t.label());
        let _ = writeln!(out, "*{}*\n", t.description());
        let _ = writeln!(out, "```\n{}\n```\n", o.variant.text);
    }
    out.push_str("---\n\n");
    out
}

fn render_outcome(out: &mut String, rank: usize, o: &VariantOutcome) {
    let (Some(score), Some(c)) = (&o.score, &o.completion) else {
        return;
    };
    let _ = writeln!(out, "### {} {}", rank_marker(rank), o.technique().label());
    let _ = writeln!(out, "**Overall Score: {:.2}/10**\n", score.aggregate);
    out.push_str("**Scores:**\n");
    for (name, value) in [
        ("Quality", score.quality),
        ("Clarity", score.clarity),
        ("Completeness", score.completeness),
        ("Relevance", score.relevance),
    ] {
        let _ = writeln!(out, "- {}: {:.1}/10", name, value);
    }
    if let Some(note) = &score.note {
        let _ = writeln!(out, "\n> {}", note);
    }
    out.push_str("\n**Metrics:**\n");
    let _ = writeln!(out, "- Tokens: {}", c.total_tokens());
    let _ = writeln!(out, "- Cost: ${:.6}", c.cost_usd);
    let _ = writeln!(out, "- Time: {:.2}s", c.latency_seconds);
    out.push_str("\n**Sample Response Preview:**\n");
    let _ = writeln!(out, "```\n{}\n```\n", preview(&c.completion_text, PREVIEW_CHARS));
    out.push_str("---\n\n");
}

pub fn render_results(result: &RunResult) -> String {
    if !result.tested {
        return "*(Evaluation skipped: run without --no-test to see results)*\n".to_string();
    }
    let mut out = String::from("## 🎯 Evaluation Results\n\n");
    let _ = writeln!(out, "*Tested all variants with {}.*\n", result.model);

    for (i, o) in result.ranked().into_iter().enumerate() {
        render_outcome(&mut out, i + 1, o);
    }

    let failed: Vec<_> = result.outcomes.iter().filter(|o| o.is_error()).collect();
    if !failed.is_empty() {
        out.push_str("### ⚠️ Failed Variants\n\n");
        for o in failed {
            if let Some(e) = &o.error {
                let _ = writeln!(out, "- {}: `{}` {}", o.technique().label(), e.kind, e.message);
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_summary(result: &RunResult) -> String {
    if !result.tested {
        return String::new();
    }
    let summary = RunSummary::from_result(result);
    let mut out = String::from("## 💰 Cost Summary\n\n");
    let _ = writeln!(out, "**Total Cost:** ${:.6}\n", summary.total_cost_usd);
    match (summary.best, summary.best_aggregate) {
        (Some(t), Some(score)) => {
            let _ = writeln!(out, "**🏆 Best Performing Variant:** {}", t.label());
            let _ = writeln!(out, "**Best Score:** {:.2}/10\n", score);
        }
        _ => out.push_str("**🏆 Best Performing Variant:** none (no variant was scored)\n\n"),
    }
    out.push_str("*Note: Scores are heuristic-based, not judged by a model.*\n");
    out
}

pub fn render_markdown(result: &RunResult) -> String {
    let mut out = render_variants(result);
    out.push_str(&render_results(result));
    let summary = render_summary(result);
    if !summary.is_empty() {
        out.push('\n');
        out.push_str(&summary);
    }
    out
}

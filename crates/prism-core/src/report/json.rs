use crate::model::RunResult;
use crate::report::RunSummary;

pub fn to_json(result: &RunResult) -> serde_json::Value {
    serde_json::json!({
        "run_id": result.run_id,
        "created_at": result.created_at,
        "base_prompt": result.base_prompt,
        "model": result.model,
        "tested": result.tested,
        "outcomes": result.outcomes,
        "ranking": result.ranking,
        "summary": RunSummary::from_result(result),
    })
}

pub fn to_json_string(result: &RunResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(result))?)
}

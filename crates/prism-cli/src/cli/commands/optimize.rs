use crate::cli::args::{OptimizeArgs, OutputFormat};
use crate::exit_codes;
use anyhow::Context;
use prism_core::config::{load_config, OptimizerConfig};
use prism_core::engine::Optimizer;
use prism_core::errors::diagnostic::diagnose;
use prism_core::errors::RunError;
use prism_core::model::RunResult;
use prism_core::providers::llm::openai::OpenAIClient;
use prism_core::providers::llm::tracing::TracingLlmClient;
use prism_core::providers::llm::LlmClient;
use prism_core::report::{console, json, markdown};
use prism_core::scoring::Scorer;
use std::sync::Arc;

pub async fn run(args: OptimizeArgs) -> anyhow::Result<i32> {
    let prompt = match read_prompt(&args) {
        Ok(p) => p,
        Err(e) => return Ok(fail(&e)),
    };
    let cfg = match build_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => return Ok(fail(&e)),
    };
    if let Err(e) = check_prompt_length(&prompt, cfg.min_prompt_chars) {
        return Ok(fail(&e));
    }

    let test = !args.no_test;
    let client: Option<Arc<dyn LlmClient>> = match (&cfg.api_key, test) {
        (Some(_), true) => match OpenAIClient::from_config(&cfg) {
            Ok(c) => Some(Arc::new(TracingLlmClient::new(Arc::new(c)))),
            Err(e) => return Ok(fail(&e)),
        },
        _ => None,
    };

    let scorer = Scorer::new(prism_metrics::default_metrics())
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let optimizer = Optimizer::new(cfg, client, scorer);
    let progress = test.then(console::stderr_progress_sink);

    let result = match optimizer.run_with_progress(&prompt, test, progress).await {
        Ok(r) => r,
        Err(e) => return Ok(fail(&e)),
    };

    let report = render(&result, &args)?;
    print!("{}", report);
    if let Some(path) = &args.output {
        std::fs::write(path, &report)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    if result.failed_count() > 0 {
        Ok(exit_codes::VARIANT_FAILED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn read_prompt(args: &OptimizeArgs) -> Result<String, RunError> {
    match (&args.prompt, &args.prompt_file) {
        (Some(p), _) => Ok(p.clone()),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            RunError::invalid_input(format!("cannot read prompt file {}: {}", path.display(), e))
        }),
        (None, None) => Err(RunError::invalid_input(
            "no prompt given (pass PROMPT or --prompt-file)",
        )),
    }
}

fn check_prompt_length(prompt: &str, min_chars: usize) -> Result<(), RunError> {
    if prompt.trim().chars().count() < min_chars {
        return Err(RunError::invalid_input(format!(
            "prompt too short (minimum {} characters)",
            min_chars
        )));
    }
    Ok(())
}

/// File config (when present), then CLI overrides, then the API key.
fn build_config(args: &OptimizeArgs) -> Result<OptimizerConfig, RunError> {
    let mut cfg = if args.config.exists() {
        load_config(&args.config)?
    } else {
        tracing::debug!(path = %args.config.display(), "config not found, using defaults");
        OptimizerConfig::default()
    };

    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }
    if let Some(n) = args.max_tokens {
        cfg.max_tokens = n;
    }
    if let Some(t) = args.temperature {
        cfg.temperature = t;
    }
    if let Some(s) = args.timeout_secs {
        cfg.timeout_secs = s;
    }
    cfg.validate()?;

    if let Some(key) = args.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        cfg = cfg.with_api_key(key);
    }
    Ok(cfg)
}

fn render(result: &RunResult, args: &OptimizeArgs) -> anyhow::Result<String> {
    Ok(match args.format {
        OutputFormat::Text => console::render_text(result, args.show_prompts),
        OutputFormat::Markdown => markdown::render_markdown(result),
        OutputFormat::Json => {
            let mut s = json::to_json_string(result)?;
            s.push('\n');
            s
        }
    })
}

fn fail(err: &RunError) -> i32 {
    match diagnose(err) {
        Some(diag) => eprint!("{}", diag.format_terminal()),
        None => eprintln!("error: {}", err),
    }
    exit_codes::CONFIG_ERROR
}

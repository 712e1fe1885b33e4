use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prism",
    version,
    about = "Rewrite a prompt with five prompt-engineering techniques and score each variant"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate variants for a prompt and, unless --no-test, evaluate them
    Optimize(OptimizeArgs),
    /// List the available techniques
    Techniques,
    /// Write a sample prism.yaml
    Init(InitArgs),
    Version,
}

#[derive(Parser, Clone, Debug)]
pub struct OptimizeArgs {
    /// Base prompt to optimize
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Read the base prompt from a file
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    #[arg(long, default_value = "prism.yaml")]
    pub config: PathBuf,

    /// Only generate variants; make no completion calls
    #[arg(long)]
    pub no_test: bool,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the report to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print full variant texts in the text report
    #[arg(long)]
    pub show_prompts: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct InitArgs {
    #[arg(long, default_value = "prism.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

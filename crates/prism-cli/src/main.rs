use clap::Parser;
use prism_core::errors::diagnostic::diagnose;
use prism_core::errors::RunError;
use tracing_subscriber::EnvFilter;

mod cli;
pub mod exit_codes;

use cli::args::Cli;
use cli::commands::dispatch;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            match diagnose(&RunError::from_anyhow(&e)) {
                Some(diag) => eprint!("{}", diag.format_terminal()),
                None => eprintln!("fatal: {e:?}"),
            }
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}

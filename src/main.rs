//! `biography` - build, generate, export and share a life-story biography.

use clap::Parser;

use biography_builder::cli::{dispatch, Cli, ExitCode};
use biography_builder::config::AppConfig;
use biography_builder::telemetry::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(ExitCode::CONFIG_ERROR);
        }
    };
    init_tracing(&config.logging);

    let mut stdout = std::io::stdout().lock();
    match dispatch(cli, config, &mut stdout).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

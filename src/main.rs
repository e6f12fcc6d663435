//! sheetscope - stylesheet resolution and scoped adoption
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use sheetscope::cli::{Cli, Commands};
use sheetscope::config::ConfigManager;
use sheetscope::error::SheetScopeResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SheetScopeResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await;

    // Logging goes to stderr so --json output stays parseable
    let filter = match cli.verbose {
        0 => EnvFilter::new("sheetscope=warn"),
        1 => EnvFilter::new("sheetscope=info"),
        _ => EnvFilter::new("sheetscope=debug"),
    };
    let json_logs = matches!(&config, Ok(c) if c.general.log_format == "json");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json_logs {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }

    let config = config?;
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Resolve(args) => sheetscope::cli::commands::resolve(args, &config).await,
        Commands::Adopt(args) => sheetscope::cli::commands::adopt(args, &config).await,
        Commands::Config(args) => {
            sheetscope::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

//! Fellowship CLI entry point.

use anyhow::Result;
use clap::Parser;
use fellowship::cli::{commands, Cli, Commands};
use fellowship::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("fellowship={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Complete { prompt, model, stream } => {
            commands::run_complete(prompt.clone(), model.clone(), *stream, settings).await?;
        }

        Commands::Tokens {
            prompt,
            model,
            temperature,
            resample,
        } => {
            commands::run_tokens(prompt.clone(), model.clone(), *temperature, *resample, settings).await?;
        }

        Commands::Assistant { task, data, model } => {
            commands::run_assistant(task, data, model.clone(), settings).await?;
        }

        Commands::Inspect { path, rows } => {
            commands::run_inspect(path, *rows, settings).await?;
        }

        Commands::Tools => {
            commands::run_tools();
        }

        Commands::Showcase { output } => {
            commands::run_showcase(output.as_deref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use resume_builder::cli::{handle_command, Cli};
use resume_builder::core::ConfigManager;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(Mutex::new(file))
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .init();
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The log file comes from the config, so config loading is logged after init.
    let config = ConfigManager::load()?;
    init_tracing(config.app.log_file.as_deref())?;

    match &config.source {
        Some(path) => info!(
            "Loaded configuration for environment {} from {}",
            config.environment,
            path.display()
        ),
        None => info!(
            "No config file, using defaults for environment {}",
            config.environment
        ),
    }
    info!("Output directory: {}", config.app.output_dir.display());

    handle_command(cli, &config.app).await
}

//! Runwatch - Incremental GitHub Actions workflow run poller
//!
//! # Usage
//!
//! ```bash
//! # Poll every enabled input once
//! runwatch run --config configs/runwatch.toml
//!
//! # Keep polling on each input's interval
//! runwatch serve
//!
//! # Forget an input's checkpoint
//! runwatch remove main
//! ```

mod cmd;
mod input_builder;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runwatch_config::{Config, LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Runwatch - Incremental GitHub Actions workflow run poller
#[derive(Parser, Debug)]
#[command(name = "runwatch")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll every enabled input once and exit
    Run(cmd::run::RunArgs),

    /// Poll inputs on their intervals until interrupted
    Serve(cmd::serve::ServeArgs),

    /// Delete the checkpoint of a removed input
    Remove(cmd::remove::RemoveArgs),

    /// Inspect stored checkpoints
    Checkpoint(cmd::checkpoint::CheckpointArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cmd::load_config(cli.config.as_deref())?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), &config);
    init_logging(&config.log, &log_level)?;

    match cli.command {
        Command::Run(args) => cmd::run::run(args, config).await,
        Command::Serve(args) => cmd::serve::run(args, config).await,
        Command::Remove(args) => cmd::remove::run(args, config).await,
        Command::Checkpoint(args) => cmd::checkpoint::run(args, config).await,
    }
}

/// Resolve log filter: CLI flag > config file
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    config.log.filter_directive(cli_level)
}

/// Initialize the tracing subscriber for logging
fn init_logging(log: &LogConfig, level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let writer = match &log.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => BoxMakeWriter::new(Arc::new(open_log_file(Path::new(path))?)),
    };
    let ansi = !matches!(log.output, LogOutput::File(_));

    let layer = match log.format {
        LogFormat::Console => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();

    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

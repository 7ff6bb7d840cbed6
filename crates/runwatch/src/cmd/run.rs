//! Run command - one polling invocation
//!
//! Polls every enabled input once, in name order, and exits. Suited to an
//! external scheduler (cron, systemd timers) driving the interval.

use anyhow::Result;
use clap::Args;
use runwatch_config::Config;
use runwatch_connectors::{InputOutcome, InputScheduler};
use std::sync::Arc;
use tracing::{info, warn};

use crate::input_builder;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Only poll these inputs (repeatable)
    #[arg(short, long = "input", value_name = "NAME")]
    pub inputs: Vec<String>,

    /// Exit with an error if any input failed
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Run the run command
pub async fn run(args: RunArgs, config: Config) -> Result<()> {
    let inputs = input_builder::build_inputs(&config, &args.inputs)?;
    if inputs.is_empty() {
        warn!("no enabled inputs configured, nothing to do");
        return Ok(());
    }

    let poller = Arc::new(input_builder::build_poller(&config).await?);
    let mut scheduler = InputScheduler::new(poller);
    for input in inputs {
        scheduler.add(input);
    }

    let summary = scheduler.run_once().await;

    for (name, outcome) in &summary.outcomes {
        match outcome {
            InputOutcome::Completed(report) => info!(
                input = %name,
                records = report.records,
                checkpoint = report.checkpoint.as_deref().unwrap_or("-"),
                checkpoint_saved = report.checkpoint_saved,
                "input complete"
            ),
            InputOutcome::Skipped => info!(input = %name, "input skipped"),
            InputOutcome::Failed(error) => warn!(input = %name, error = %error, "input failed"),
        }
    }

    if args.fail_on_error && summary.failed() > 0 {
        anyhow::bail!("{} of {} inputs failed", summary.failed(), summary.outcomes.len());
    }
    Ok(())
}

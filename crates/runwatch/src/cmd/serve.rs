//! Serve command - poll inputs on their intervals
//!
//! Runs until SIGINT/SIGTERM, or until every input is run-once (`interval =
//! "-1"`) and has finished. In-flight cycles are allowed to complete on
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use runwatch_config::Config;
use runwatch_connectors::InputScheduler;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::input_builder;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// How often to check for due inputs, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub tick_ms: u64,
}

/// Run the serve command
pub async fn run(args: ServeArgs, config: Config) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        "runwatch starting"
    );

    let inputs = input_builder::build_inputs(&config, &[])?;
    if inputs.is_empty() {
        warn!("no enabled inputs configured, nothing to do");
        return Ok(());
    }

    let poller = Arc::new(input_builder::build_poller(&config).await?);
    let mut scheduler =
        InputScheduler::new(poller).with_check_interval(Duration::from_millis(args.tick_ms.max(1)));
    for input in inputs {
        scheduler.add(input);
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("shutdown signal received, waiting for in-flight cycles...");
        signal_cancel.cancel();
    });

    scheduler.run(cancel).await;

    info!("runwatch shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

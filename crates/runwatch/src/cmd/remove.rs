//! Remove command - checkpoint cleanup for a deleted input
//!
//! Meant to be called by whatever removes an input from the configuration.
//! Deletion failures are logged, never reported through the exit code.

use anyhow::Result;
use clap::Args;
use runwatch_config::Config;

use crate::input_builder;

/// Remove command arguments
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Input identifier (`name` or `scheme://name`)
    #[arg(value_name = "INPUT")]
    pub input: String,
}

/// Run the remove command
pub async fn run(args: RemoveArgs, config: Config) -> Result<()> {
    let store = input_builder::build_store(&config.checkpoints);
    runwatch_connectors::lifecycle::delete_checkpoint(
        store.as_ref(),
        &config.checkpoints.collection_prefix,
        &args.input,
    )
    .await;
    Ok(())
}

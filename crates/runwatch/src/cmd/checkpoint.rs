//! Checkpoint command - inspect stored checkpoints

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use runwatch_config::Config;
use runwatch_connectors::{CheckpointStore, collection_key};

use crate::input_builder;

/// Checkpoint command arguments
#[derive(Args, Debug)]
pub struct CheckpointArgs {
    #[command(subcommand)]
    pub command: CheckpointCommand,
}

#[derive(Subcommand, Debug)]
pub enum CheckpointCommand {
    /// Print the stored checkpoint of one input, or of every configured input
    Show {
        /// Input identifier (`name` or `scheme://name`)
        #[arg(value_name = "INPUT")]
        input: Option<String>,
    },
}

/// Run the checkpoint command
pub async fn run(args: CheckpointArgs, config: Config) -> Result<()> {
    match args.command {
        CheckpointCommand::Show { input } => show(input, &config).await,
    }
}

async fn show(input: Option<String>, config: &Config) -> Result<()> {
    let store = input_builder::build_store(&config.checkpoints);
    let ids: Vec<String> = match input {
        Some(id) => vec![id],
        None => config.inputs.iter().map(|(name, _)| name.clone()).collect(),
    };

    for id in ids {
        let key = collection_key(&config.checkpoints.collection_prefix, &id);
        let value = store
            .get(&key)
            .await
            .with_context(|| format!("failed to read checkpoint for '{}'", id))?;
        println!("{}\t{}\t{}", id, key, value.as_deref().unwrap_or("-"));
    }
    Ok(())
}

//! Builds the polling engine and its inputs from configuration

use std::sync::Arc;

use anyhow::{Context, Result};
use runwatch_config::{CheckpointsConfig, Config, CredentialsConfig, InputConfig, OutputConfig};
use runwatch_connectors::{
    CheckpointStore, CredentialSource, EventSink, FileCheckpointStore, FileSink, GitHub,
    GitHubConfig, Input, InputInstance, Interval, Poller, PollerConfig, ScheduledInput,
    StaticCredentials, StdoutSink,
};
use tracing::{info, warn};

/// Engine settings from the `[checkpoints]` section
pub fn poller_config(checkpoints: &CheckpointsConfig) -> PollerConfig {
    PollerConfig {
        collection_prefix: checkpoints.collection_prefix.clone(),
        lookback_secs: checkpoints.lookback_secs,
    }
}

/// Resolver over the declared credentials
pub fn build_credentials(credentials: &CredentialsConfig) -> StaticCredentials {
    let mut resolver = StaticCredentials::new();
    for (name, credential) in credentials.iter() {
        let source = match (&credential.token, &credential.token_env) {
            (Some(token), _) => CredentialSource::Literal(token.clone()),
            (None, Some(var)) => CredentialSource::Env(var.clone()),
            // Rejected by validation
            (None, None) => continue,
        };
        resolver.insert(name.clone(), source);
    }
    resolver
}

/// File-backed checkpoint store rooted at `[checkpoints].path`
pub fn build_store(checkpoints: &CheckpointsConfig) -> Arc<dyn CheckpointStore> {
    Arc::new(FileCheckpointStore::new(&checkpoints.path))
}

/// Event sink selected by `[output]`
pub async fn build_sink(output: &OutputConfig) -> Result<Arc<dyn EventSink>> {
    Ok(match output {
        OutputConfig::Stdout => Arc::new(StdoutSink::new()),
        OutputConfig::File { path } => Arc::new(
            FileSink::open(path)
                .await
                .with_context(|| format!("failed to open output file {}", path))?,
        ),
    })
}

/// Polling engine wired to the configured store, sink and credentials
pub async fn build_poller(config: &Config) -> Result<Poller> {
    Ok(Poller::new(
        build_store(&config.checkpoints),
        build_sink(&config.output).await?,
        Arc::new(build_credentials(&config.credentials)),
        poller_config(&config.checkpoints),
    ))
}

/// Input instance for a configured input
pub fn instance(name: &str, input: &InputConfig) -> InputInstance {
    InputInstance {
        id: name.to_string(),
        account: input.account.clone(),
        repo: input.repo.clone(),
        credential: input.credential.clone(),
        index: input.index.clone(),
        advance_on_empty: input.advance_on_empty,
    }
}

/// Source client settings for a configured input
pub fn github_config(input: &InputConfig) -> GitHubConfig {
    GitHubConfig {
        api_url: input.api_url.clone(),
        timeout_secs: input.timeout_secs,
        per_page: input.per_page,
        max_pages: input.max_pages,
    }
}

/// Scheduled inputs for every enabled input, or only the named ones
///
/// Naming an unknown input is an error; disabled inputs are skipped even
/// when named.
pub fn build_inputs(config: &Config, only: &[String]) -> Result<Vec<ScheduledInput<GitHub>>> {
    if let Some(unknown) = only.iter().find(|name| !config.inputs.contains(name)) {
        anyhow::bail!("unknown input '{}'", unknown);
    }

    let mut inputs = Vec::new();
    for (name, input) in config.inputs.iter() {
        if !only.is_empty() && !only.contains(name) {
            continue;
        }
        if input.disabled {
            if only.contains(name) {
                warn!(input = %name, "input is disabled, skipping");
            }
            continue;
        }

        let interval: Interval = input
            .interval
            .parse()
            .with_context(|| format!("input '{}'", name))?;
        let github = GitHub::new(github_config(input))
            .with_context(|| format!("failed to create GitHub client for input '{}'", name))?;

        info!(
            input = %name,
            account = %input.account,
            repo = %input.repo,
            interval = ?interval,
            "configured input"
        );
        inputs.push(ScheduledInput::new(Input::new(instance(name, input), github), interval));
    }

    Ok(inputs)
}

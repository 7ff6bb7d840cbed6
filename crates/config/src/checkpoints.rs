//! Checkpoint storage configuration

use serde::Deserialize;

/// Where checkpoints live and how new inputs start
///
/// # Example
///
/// ```toml
/// [checkpoints]
/// path = "/var/lib/runwatch/checkpoints"
/// lookback_secs = 3600
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointsConfig {
    /// Directory holding one JSON document per input
    /// Default: data/checkpoints
    pub path: String,

    /// Prefix of per-input collection keys
    /// Default: github_actions_workflow_runs_for_splunk
    pub collection_prefix: String,

    /// Lookback for inputs without a checkpoint, in seconds
    /// Default: 86400 (1 day)
    pub lookback_secs: u64,
}

impl Default for CheckpointsConfig {
    fn default() -> Self {
        Self {
            path: "data/checkpoints".to_string(),
            collection_prefix: "github_actions_workflow_runs_for_splunk".to_string(),
            lookback_secs: 86_400,
        }
    }
}

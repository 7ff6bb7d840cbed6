//! Command implementations for the runwatch CLI

pub mod checkpoint;
pub mod remove;
pub mod run;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use runwatch_config::Config;

/// Searched in order when no `--config` is given
const DEFAULT_CONFIG_PATHS: &[&str] = &["configs/runwatch.toml", "runwatch.toml"];

/// Load the configuration file
///
/// An explicit path must exist. Without one, the default locations are
/// tried and built-in defaults are used when none exists.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()));
    }

    for candidate in DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from) {
        if candidate.exists() {
            return Config::from_file(&candidate).with_context(|| {
                format!("failed to load configuration from {}", candidate.display())
            });
        }
    }

    Ok(Config::default())
}

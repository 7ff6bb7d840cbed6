//! Configuration validation
//!
//! Validates config consistency:
//! - Every input names an account, a repository and a declared credential
//! - Input index names are 1 to 80 characters
//! - Intervals are `-1` or a number of seconds up to one year
//! - Paging and timeout settings are usable
//! - Credentials carry a token or an environment variable
//! - File output has a path
//! - Logs and events don't share stdout

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::inputs::InputConfig;
use crate::logging::LogOutput;
use crate::output::OutputConfig;

/// Longest accepted index name
const MAX_INDEX_LEN: usize = 80;

/// Longest accepted interval (one year)
const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_checkpoints(config)?;
    validate_output(config)?;
    validate_log(config)?;
    validate_credentials(config)?;
    validate_inputs(config)?;
    Ok(())
}

fn validate_checkpoints(config: &Config) -> Result<()> {
    if config.checkpoints.path.trim().is_empty() {
        return Err(ConfigError::missing_field("checkpoints", "checkpoints", "path"));
    }
    if config.checkpoints.collection_prefix.trim().is_empty() {
        return Err(ConfigError::missing_field(
            "checkpoints",
            "checkpoints",
            "collection_prefix",
        ));
    }
    Ok(())
}

fn validate_output(config: &Config) -> Result<()> {
    if let OutputConfig::File { path } = &config.output
        && path.trim().is_empty()
    {
        return Err(ConfigError::missing_field("output", "file", "path"));
    }
    Ok(())
}

fn validate_log(config: &Config) -> Result<()> {
    if config.log.output == LogOutput::Stdout && config.output == OutputConfig::Stdout {
        return Err(ConfigError::invalid_value(
            "log",
            "log",
            "output",
            "stdout carries the event stream, log to stderr or a file",
        ));
    }
    Ok(())
}

fn validate_credentials(config: &Config) -> Result<()> {
    for (name, credential) in config.credentials.iter() {
        let has_token = credential.token.as_deref().is_some_and(|t| !t.trim().is_empty());
        let has_env = credential.token_env.as_deref().is_some_and(|v| !v.trim().is_empty());

        match (has_token, has_env) {
            (false, false) => return Err(ConfigError::missing_field("credential", name, "token")),
            (true, true) => {
                return Err(ConfigError::invalid_value(
                    "credential",
                    name,
                    "token",
                    "set either 'token' or 'token_env', not both",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_inputs(config: &Config) -> Result<()> {
    for (name, input) in config.inputs.iter() {
        validate_input(name, input)?;

        if !config.credentials.contains(&input.credential) {
            return Err(ConfigError::unknown_credential(name, &input.credential));
        }
    }
    Ok(())
}

fn validate_input(name: &str, input: &InputConfig) -> Result<()> {
    if input.account.trim().is_empty() {
        return Err(ConfigError::missing_field("input", name, "account"));
    }
    if input.repo.trim().is_empty() {
        return Err(ConfigError::missing_field("input", name, "repo"));
    }
    if input.credential.trim().is_empty() {
        return Err(ConfigError::missing_field("input", name, "credential"));
    }

    let index_len = input.index.chars().count();
    if index_len == 0 || index_len > MAX_INDEX_LEN {
        return Err(ConfigError::invalid_value(
            "input",
            name,
            "index",
            format!("length must be between 1 and {} characters", MAX_INDEX_LEN),
        ));
    }

    if !is_valid_interval(&input.interval) {
        return Err(ConfigError::invalid_value(
            "input",
            name,
            "interval",
            format!(
                "'{}' must be -1 or a number of seconds between 0 and {}",
                input.interval, MAX_INTERVAL_SECS
            ),
        ));
    }

    if input.api_url.trim().is_empty() {
        return Err(ConfigError::missing_field("input", name, "api_url"));
    }
    if input.timeout_secs == 0 {
        return Err(ConfigError::invalid_value(
            "input",
            name,
            "timeout_secs",
            "must be at least 1",
        ));
    }
    if !(1..=100).contains(&input.per_page) {
        return Err(ConfigError::invalid_value(
            "input",
            name,
            "per_page",
            format!("must be within 1..=100, got {}", input.per_page),
        ));
    }
    if input.max_pages == 0 {
        return Err(ConfigError::invalid_value(
            "input",
            name,
            "max_pages",
            "must be at least 1",
        ));
    }

    Ok(())
}

/// `-1` or one or more ASCII digits no larger than [`MAX_INTERVAL_SECS`]
fn is_valid_interval(interval: &str) -> bool {
    let interval = interval.trim();
    if interval == "-1" {
        return true;
    }
    !interval.is_empty()
        && interval.bytes().all(|b| b.is_ascii_digit())
        && interval
            .parse::<u64>()
            .is_ok_and(|secs| secs <= MAX_INTERVAL_SECS)
}

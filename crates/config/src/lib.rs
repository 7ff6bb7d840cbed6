//! Runwatch Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Only inputs and their credentials need to be declared.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use runwatch_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[log]\nlevel = \"debug\"").unwrap();
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [checkpoints]
//! path = "data/checkpoints"
//!
//! [output]
//! type = "stdout"
//!
//! [credentials.github_bot]
//! token_env = "GITHUB_TOKEN"
//!
//! [inputs.main]
//! account = "octo-org"
//! repo = "hello"
//! credential = "github_bot"
//! index = "github"
//! interval = "300"
//! ```

mod checkpoints;
mod credentials;
mod error;
mod inputs;
mod logging;
mod output;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use checkpoints::CheckpointsConfig;
pub use credentials::{CredentialConfig, CredentialsConfig};
pub use error::{ConfigError, Result};
pub use inputs::{InputConfig, InputsConfig};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use output::OutputConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Checkpoint storage
    pub checkpoints: CheckpointsConfig,

    /// Event output
    pub output: OutputConfig,

    /// Named API credentials
    pub credentials: CredentialsConfig,

    /// Polling inputs
    pub inputs: InputsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Names of inputs that are not disabled
    pub fn enabled_inputs(&self) -> Vec<&str> {
        self.inputs.enabled().map(|(name, _)| name.as_str()).collect()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert!(config.inputs.is_empty());
        assert_eq!(config.output, OutputConfig::Stdout);
        assert_eq!(config.log.output, LogOutput::Stderr);
        assert_eq!(config.checkpoints.path, "data/checkpoints");
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[log]
level = "debug"
format = "json"

[checkpoints]
path = "/var/lib/runwatch"
lookback_secs = 3600

[output]
type = "file"
path = "/var/log/runwatch/events.jsonl"

[credentials.bot]
token_env = "GITHUB_TOKEN"

[inputs.main]
account = "octo"
repo = "hello"
credential = "bot"
index = "github"
interval = "-1"

[inputs.enterprise]
account = "corp"
repo = "platform"
credential = "bot"
api_url = "https://github.example.com/api/v3"
per_page = 50
disabled = true
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.checkpoints.lookback_secs, 3600);
        assert_eq!(config.output.type_name(), "file");
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.enabled_inputs(), vec!["main"]);

        let enterprise = config.inputs.get("enterprise").unwrap();
        assert_eq!(enterprise.per_page, 50);
        assert_eq!(enterprise.index, "default");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_str("[inputs.main"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[credentials.bot]\ntoken = \"ghp_x\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.credentials.contains("bot"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/runwatch.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("/nonexistent/runwatch.toml"));
    }
}

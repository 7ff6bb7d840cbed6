//! Polling input configuration
//!
//! Each `[inputs.<name>]` table is one polling job for one repository.
//!
//! ```toml
//! [inputs.main]
//! account = "octo-org"
//! repo = "hello"
//! credential = "github_bot"
//! index = "github"
//! interval = "300"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

/// Container for all inputs, ordered by name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    #[serde(flatten)]
    inputs: BTreeMap<String, InputConfig>,
}

impl InputsConfig {
    pub fn get(&self, name: &str) -> Option<&InputConfig> {
        self.inputs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InputConfig)> {
        self.inputs.iter()
    }

    /// Inputs that are not disabled
    pub fn enabled(&self) -> impl Iterator<Item = (&String, &InputConfig)> {
        self.inputs.iter().filter(|(_, input)| !input.disabled)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// One polling input
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// GitHub user or organization owning the repository
    pub account: String,

    /// Repository name
    pub repo: String,

    /// Name of a `[credentials.*]` entry
    pub credential: String,

    /// Destination index for events
    /// Default: default
    pub index: String,

    /// Seconds between cycles, `0` to rerun immediately, `-1` to run once
    /// Default: 300
    pub interval: String,

    /// Skip this input without removing it
    pub disabled: bool,

    /// API base URL (GitHub Enterprise)
    /// Default: https://api.github.com
    pub api_url: String,

    /// Per-request timeout in seconds
    /// Default: 60
    pub timeout_secs: u64,

    /// Records per page (1..=100)
    /// Default: 100
    pub per_page: u32,

    /// Pages fetched per cycle before giving up
    /// Default: 1000
    pub max_pages: u32,

    /// Advance the checkpoint to "now" when a cycle finds nothing
    /// Default: true
    pub advance_on_empty: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            repo: String::new(),
            credential: String::new(),
            index: "default".to_string(),
            interval: "300".to_string(),
            disabled: false,
            api_url: "https://api.github.com".to_string(),
            timeout_secs: 60,
            per_page: 100,
            max_pages: 1000,
            advance_on_empty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_input_defaults() {
        let toml = r#"
[main]
account = "octo"
repo = "hello"
credential = "bot"
"#;
        let config: InputsConfig = toml::from_str(toml).unwrap();
        let input = config.get("main").unwrap();
        assert_eq!(input.index, "default");
        assert_eq!(input.interval, "300");
        assert_eq!(input.api_url, "https://api.github.com");
        assert_eq!(input.timeout_secs, 60);
        assert_eq!(input.per_page, 100);
        assert_eq!(input.max_pages, 1000);
        assert!(input.advance_on_empty);
        assert!(!input.disabled);
    }

    #[test]
    fn test_enabled_filters_disabled() {
        let toml = r#"
[b]
account = "octo"
repo = "b"
credential = "bot"

[a]
account = "octo"
repo = "a"
credential = "bot"
disabled = true

[c]
account = "octo"
repo = "c"
credential = "bot"
"#;
        let config: InputsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.len(), 3);
        let names: Vec<&String> = config.enabled().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}

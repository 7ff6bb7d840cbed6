//! Connector configuration types
//!
//! Plain settings structs consumed by the GitHub source and the polling
//! engine. The binary maps the TOML configuration onto these.

use crate::error::ConnectorError;
use serde::Deserialize;
use std::time::Duration;

/// Default GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Records per page requested from the API (the API maximum)
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Upper bound on pages fetched in one cycle
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Prefix of checkpoint collection keys
pub const DEFAULT_COLLECTION_PREFIX: &str = "github_actions_workflow_runs_for_splunk";

/// First-run lookback window
pub const DEFAULT_LOOKBACK_SECS: u64 = 86_400;

/// GitHub workflow runs source configuration
///
/// # Example
///
/// ```toml
/// api_url = "https://github.example.com/api/v3"
/// timeout_secs = 60
/// per_page = 100
/// max_pages = 1000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL (default: https://api.github.com)
    pub api_url: String,

    /// Request timeout in seconds (default: 60)
    pub timeout_secs: u64,

    /// Page size (default: 100)
    pub per_page: u32,

    /// Maximum pages per fetch (default: 1000)
    pub max_pages: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl GitHubConfig {
    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.api_url.trim().is_empty() {
            return Err(ConnectorError::ConfigError("api_url is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConnectorError::ConfigError(
                "timeout_secs must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(ConnectorError::ConfigError(format!(
                "per_page must be within 1..=100, got {}",
                self.per_page
            )));
        }
        if self.max_pages == 0 {
            return Err(ConnectorError::ConfigError(
                "max_pages must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Polling engine settings shared by all inputs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Prefix for derived checkpoint keys
    pub collection_prefix: String,

    /// Lookback used when no checkpoint exists, in seconds (default: 1 day)
    pub lookback_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            collection_prefix: DEFAULT_COLLECTION_PREFIX.to_string(),
            lookback_secs: DEFAULT_LOOKBACK_SECS,
        }
    }
}

impl PollerConfig {
    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_config_defaults() {
        let config = GitHubConfig::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.per_page, 100);
        assert_eq!(config.max_pages, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_github_config_rejects_large_page() {
        let config = GitHubConfig {
            per_page: 101,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConnectorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_github_config_rejects_zero_pages() {
        let config = GitHubConfig {
            max_pages: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_github_config_rejects_zero_timeout() {
        let config = GitHubConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poller_config_defaults() {
        let config = PollerConfig::default();
        assert_eq!(
            config.collection_prefix,
            "github_actions_workflow_runs_for_splunk"
        );
        assert_eq!(config.lookback(), Duration::from_secs(86_400));
    }
}

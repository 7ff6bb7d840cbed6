//! Named API credentials
//!
//! Inputs refer to a credential by name instead of carrying the token.
//!
//! ```toml
//! [credentials.github_bot]
//! token_env = "GITHUB_TOKEN"
//!
//! [credentials.legacy]
//! token = "ghp_xxx"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

/// Container for all credential declarations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    #[serde(flatten)]
    credentials: BTreeMap<String, CredentialConfig>,
}

impl CredentialsConfig {
    pub fn get(&self, name: &str) -> Option<&CredentialConfig> {
        self.credentials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.credentials.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CredentialConfig)> {
        self.credentials.iter()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

/// One credential; exactly one of `token` / `token_env` is expected
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Token given inline
    pub token: Option<String>,

    /// Environment variable holding the token
    pub token_env: Option<String>,
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_env", &self.token_env)
            .finish()
    }
}

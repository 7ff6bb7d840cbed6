//! Credential resolution
//!
//! Inputs reference a credential by name; the token itself lives either in
//! the configuration file or in an environment variable and is looked up at
//! the start of every cycle. Tokens are never written anywhere.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ConnectorError;
use crate::traits::CredentialResolver;

/// Where a named credential's secret comes from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Token given inline
    Literal(String),
    /// Token read from an environment variable at resolve time
    Env(String),
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("Literal(<redacted>)"),
            Self::Env(var) => f.debug_tuple("Env").field(var).finish(),
        }
    }
}

/// Resolver over a fixed set of named credentials
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<String, CredentialSource>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential under `name`
    pub fn insert(&mut self, name: impl Into<String>, source: CredentialSource) {
        self.entries.insert(name.into(), source);
    }

    /// Builder form of [`StaticCredentials::insert`]
    pub fn with(mut self, name: impl Into<String>, source: CredentialSource) -> Self {
        self.insert(name, source);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentials {
    async fn resolve(&self, reference: &str) -> Result<String, ConnectorError> {
        let token = match self.entries.get(reference) {
            Some(CredentialSource::Literal(token)) => token.trim().to_string(),
            Some(CredentialSource::Env(var)) => std::env::var(var)
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            None => String::new(),
        };

        if token.is_empty() {
            return Err(ConnectorError::CredentialNotFound(reference.to_string()));
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_literal() {
        let creds =
            StaticCredentials::new().with("main", CredentialSource::Literal("ghp_abc".into()));
        assert_eq!(creds.resolve("main").await.unwrap(), "ghp_abc");
    }

    #[tokio::test]
    async fn test_resolve_unknown_reference() {
        let creds = StaticCredentials::new();
        let result = creds.resolve("missing").await;
        assert!(matches!(result, Err(ConnectorError::CredentialNotFound(ref r)) if r == "missing"));
    }

    #[tokio::test]
    async fn test_resolve_empty_literal_fails() {
        let creds = StaticCredentials::new().with("blank", CredentialSource::Literal("  ".into()));
        assert!(creds.resolve("blank").await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_env() {
        let var = "RUNWATCH_TEST_CREDENTIAL_TOKEN";
        // SAFETY: variable name is unique to this test
        unsafe { std::env::set_var(var, "ghp_from_env") };

        let creds = StaticCredentials::new().with("env", CredentialSource::Env(var.into()));
        assert_eq!(creds.resolve("env").await.unwrap(), "ghp_from_env");

        // SAFETY: variable name is unique to this test
        unsafe { std::env::remove_var(var) };
    }

    #[tokio::test]
    async fn test_resolve_unset_env_fails() {
        let creds = StaticCredentials::new().with(
            "env",
            CredentialSource::Env("RUNWATCH_TEST_UNSET_VARIABLE".into()),
        );
        assert!(matches!(
            creds.resolve("env").await,
            Err(ConnectorError::CredentialNotFound(_))
        ));
    }

    #[test]
    fn test_debug_redacts_literal() {
        let source = CredentialSource::Literal("ghp_secret".into());
        assert!(!format!("{:?}", source).contains("ghp_secret"));
    }
}

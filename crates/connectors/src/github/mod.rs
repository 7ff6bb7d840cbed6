//! GitHub connector for pulling workflow runs
//!
//! Lists `GET /repos/{owner}/{repo}/actions/runs` filtered by creation time,
//! following page numbers until the API returns an empty page.

use crate::config::GitHubConfig;
use crate::error::ConnectorError;
use crate::record::Record;
use crate::traits::RecordSource;
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;

/// Media type requested from the API
const ACCEPT: &str = "application/vnd.github+json";

/// GitHub connector for fetching workflow runs
pub struct GitHub {
    api_url: String,
    client: reqwest::Client,
    per_page: u32,
    max_pages: u32,
}

impl GitHub {
    /// Create a new GitHub connector with the given configuration
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or HTTP client creation
    /// fails (e.g., TLS or proxy misconfiguration)
    pub fn new(config: GitHubConfig) -> Result<Self, ConnectorError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("runwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConnectorError::Init(format!("GitHub HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            client,
            per_page: config.per_page,
            max_pages: config.max_pages,
        })
    }

    /// Workflow runs endpoint for a repository
    fn runs_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/actions/runs", self.api_url, owner, repo)
    }

    /// Map a non-success response to an error
    fn handle_error_status(&self, response: &reqwest::Response, entity: &str) -> ConnectorError {
        let status = response.status();
        match status {
            reqwest::StatusCode::NOT_FOUND => ConnectorError::NotFound(entity.to_string()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ConnectorError::AuthFailed(format!("{} for {}", status, entity))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited {
                retry_after_secs: retry_after(response).unwrap_or(60),
            },
            _ => ConnectorError::Api {
                status: status.as_u16(),
                url: response.url().to_string(),
            },
        }
    }

    /// Fetch one page of runs (single attempt, no retry)
    async fn fetch_page(
        &self,
        url: &str,
        entity: &str,
        token: &str,
        boundary: &str,
        page: u32,
    ) -> Result<Vec<Record>, ConnectorError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .query(&[
                ("created", boundary.to_string()),
                ("page", page.to_string()),
                ("per_page", self.per_page.to_string()),
            ])
            .header(reqwest::header::ACCEPT, ACCEPT)
            .bearer_auth(token)
            .send()
            .await?;

        debug!(
            connector = "github",
            url,
            page,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "workflow runs request completed"
        );

        if !response.status().is_success() {
            return Err(self.handle_error_status(&response, entity));
        }

        let body: RunsPage = response.json().await?;
        Ok(body.workflow_runs.into_iter().map(Record::new).collect())
    }
}

impl RecordSource for GitHub {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn fetch_since(
        &self,
        account: &str,
        resource: &str,
        token: &str,
        boundary: &str,
    ) -> Result<Vec<Record>, ConnectorError> {
        let url = self.runs_url(account, resource);
        let entity = format!("{}/{}", account, resource);
        let mut records = Vec::new();

        for page in 1..=self.max_pages {
            let runs = self.fetch_page(&url, &entity, token, boundary, page).await?;
            if runs.is_empty() {
                debug!(
                    connector = "github",
                    entity = %entity,
                    pages = page - 1,
                    records = records.len(),
                    "pagination complete"
                );
                return Ok(records);
            }
            records.extend(runs);
        }

        Err(ConnectorError::PageLimitExceeded {
            max_pages: self.max_pages,
        })
    }
}

/// Seconds from a `Retry-After` header, if present and numeric
fn retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

// --- API Response Types ---

/// One page of the workflow runs listing
#[derive(Debug, Deserialize)]
struct RunsPage {
    #[serde(default)]
    workflow_runs: Vec<serde_json::Value>,
}

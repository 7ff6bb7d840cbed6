//! Seams between the polling engine and its collaborators

use async_trait::async_trait;

use crate::error::ConnectorError;
use crate::record::{Event, Record};

/// A remote API that can list records created after a boundary
///
/// Implementations return every matching record across all pages, in the
/// order the API produced them.
pub trait RecordSource: Send + Sync {
    /// Returns the source name (e.g., "github")
    fn name(&self) -> &'static str;

    /// Build the filter expression meaning "created strictly after `checkpoint`"
    fn boundary(&self, checkpoint: &str) -> String {
        format!(">{}", checkpoint)
    }

    /// Fetch all records matching `boundary` for `account/resource`
    ///
    /// # Arguments
    /// * `account` - Owning user or organization
    /// * `resource` - Repository name
    /// * `token` - Resolved API token
    /// * `boundary` - Filter expression from [`RecordSource::boundary`]
    fn fetch_since(
        &self,
        account: &str,
        resource: &str,
        token: &str,
        boundary: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, ConnectorError>> + Send;
}

/// Durable string value per collection key
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Read the checkpoint, `None` when never written
    async fn get(&self, key: &str) -> Result<Option<String>, ConnectorError>;

    /// Write (or overwrite) the checkpoint
    async fn set(&self, key: &str, value: &str) -> Result<(), ConnectorError>;

    /// Remove the checkpoint; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), ConnectorError>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Downstream consumer of events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Hand one event to the sink
    async fn write(&self, event: Event) -> Result<(), ConnectorError>;

    /// Sink name for logging
    fn name(&self) -> &'static str;
}

/// Resolves a credential reference to its secret value
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Resolve `reference`, failing when it is unknown or empty
    async fn resolve(&self, reference: &str) -> Result<String, ConnectorError>;
}

//! Runwatch - Connectors
//!
//! Checkpointed incremental polling of GitHub Actions workflow runs.
//!
//! Every cycle reads a per-input checkpoint, fetches the runs created after
//! it, emits one event per run and advances the checkpoint.
//!
//! # Components
//!
//! - **Source** ([`GitHub`]) - paginated workflow runs listing
//! - **Checkpoint stores** ([`FileCheckpointStore`], [`MemoryCheckpointStore`])
//! - **Sinks** ([`StdoutSink`], [`FileSink`], [`MemorySink`])
//! - **Engine** ([`Poller`]) - one cycle per input, failures isolated per input
//! - **Scheduler** ([`InputScheduler`]) - runs inputs on their intervals
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use runwatch_connectors::*;
//!
//! let poller = Poller::new(
//!     Arc::new(FileCheckpointStore::new("data/checkpoints")),
//!     Arc::new(StdoutSink::new()),
//!     Arc::new(StaticCredentials::new().with("main", CredentialSource::Env("GITHUB_TOKEN".into()))),
//!     PollerConfig::default(),
//! );
//!
//! let github = GitHub::new(GitHubConfig::default())?;
//! let summary = poller.run_all(&[Input::new(instance, github)]).await;
//! ```

pub mod checkpoint;
pub mod config;
mod credentials;
mod error;
mod github;
pub mod lifecycle;
mod poller;
mod record;
mod scheduler;
pub mod sink;
pub mod time;
mod traits;

// Re-exports
pub use checkpoint::{FileCheckpointStore, MemoryCheckpointStore, collection_key};
pub use config::{GitHubConfig, PollerConfig};
pub use credentials::{CredentialSource, StaticCredentials};
pub use error::ConnectorError;
pub use github::GitHub;
pub use poller::{
    CycleReport, Input, InputInstance, InputOutcome, InstanceGuard, InstanceLocks,
    InvocationSummary, Poller,
};
pub use record::{EVENT_TIME_FIELD, Event, Record, SOURCETYPE};
pub use scheduler::{InputScheduler, Interval, ScheduledInput};
pub use sink::{FileSink, MemorySink, StdoutSink};
pub use traits::{CheckpointStore, CredentialResolver, EventSink, RecordSource};

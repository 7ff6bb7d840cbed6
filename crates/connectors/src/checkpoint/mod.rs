//! Checkpoint storage
//!
//! A checkpoint is the creation-time boundary below which every record of
//! one input has been emitted. Stores only map a collection key to a string;
//! the polling engine owns the semantics.
//!
//! # Keys
//!
//! Keys are derived from the input identifier by dropping any path-style
//! qualifier (`github_actions_workflow_stats://main` -> `main`) and adding a
//! fixed prefix, so the engine and the removal hook always agree.

mod file;

pub use file::FileCheckpointStore;

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::ConnectorError;
use crate::traits::CheckpointStore;

/// Last path segment of an input identifier
pub fn normalize_input_name(input_id: &str) -> &str {
    input_id.rsplit('/').next().unwrap_or(input_id)
}

/// Stable collection key for an input
pub fn collection_key(prefix: &str, input_id: &str) -> String {
    format!("{}_{}", prefix, normalize_input_name(input_id))
}

/// In-process checkpoint store
///
/// Not durable; used for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value (test setup)
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.write().insert(key.into(), value.into());
        self
    }

    /// Synchronous read for assertions
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ConnectorError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ConnectorError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ConnectorError> {
        self.values.write().remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[path = "checkpoint_test.rs"]
mod tests;

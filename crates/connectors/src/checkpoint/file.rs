//! File-backed checkpoint store
//!
//! One JSON document per key under a directory:
//!
//! ```text
//! {dir}/{key}.json   {"checkpoint": "2024-01-01T00:00:00Z"}
//! ```
//!
//! Bytes of the key outside `[A-Za-z0-9_-]` are written as `%XX`, so every
//! key gets its own file and none can name a path outside `dir`.
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves the previous checkpoint intact.

use std::fmt::Write;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConnectorError;
use crate::traits::CheckpointStore;

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointDocument {
    checkpoint: String,
}

/// Checkpoint store persisting to local files
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the document for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for b in key.bytes() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
                name.push(b as char);
            } else {
                let _ = write!(name, "%{:02X}", b);
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ConnectorError> {
        let path = self.path_for(key);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConnectorError::checkpoint(key, e)),
        };

        let doc: CheckpointDocument = serde_json::from_slice(&contents)
            .map_err(|e| ConnectorError::checkpoint(key, format!("corrupt document: {}", e)))?;
        Ok(Some(doc.checkpoint))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ConnectorError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ConnectorError::checkpoint(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec(&CheckpointDocument {
            checkpoint: value.to_string(),
        })?;

        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| ConnectorError::checkpoint(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| ConnectorError::checkpoint(key, e))?;

        debug!(key, path = %path.display(), "checkpoint written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ConnectorError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConnectorError::checkpoint(key, e)),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

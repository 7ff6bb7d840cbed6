//! Event sinks
//!
//! Sinks receive one [`Event`] per record. The line format written by the
//! JSON sinks is:
//!
//! ```text
//! {"time":1704067200.0,"index":"github","sourcetype":"github:workflow_runs","event":{...}}
//! ```
//!
//! `event` is the record's raw JSON, embedded as-is.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::value::RawValue;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::ConnectorError;
use crate::record::Event;
use crate::traits::EventSink;

#[derive(Serialize)]
struct EventLine<'a> {
    time: f64,
    index: &'a str,
    sourcetype: &'a str,
    event: &'a RawValue,
}

/// Render an event as one JSON line (with trailing newline)
pub fn render_line(event: &Event) -> Result<String, ConnectorError> {
    let raw: &RawValue = serde_json::from_str(&event.data)?;
    let mut line = serde_json::to_string(&EventLine {
        time: event.time,
        index: &event.index,
        sourcetype: &event.sourcetype,
        event: raw,
    })?;
    line.push('\n');
    Ok(line)
}

/// Writes JSON lines to stdout
///
/// Each line is written and flushed under the lock, so events from
/// concurrent cycles never interleave.
pub struct StdoutSink {
    out: Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::with_writer(tokio::io::stdout())
    }

    fn with_writer(out: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for StdoutSink {
    async fn write(&self, event: Event) -> Result<(), ConnectorError> {
        let line = render_line(&event)?;
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| ConnectorError::sink("stdout", e))?;
        out.flush()
            .await
            .map_err(|e| ConnectorError::sink("stdout", e))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

/// Appends JSON lines to a file
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl FileSink {
    /// Open (or create) `path` for appending
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConnectorError::sink("file", e))?;
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| ConnectorError::sink("file", format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSink for FileSink {
    async fn write(&self, event: Event) -> Result<(), ConnectorError> {
        let line = render_line(&event)?;
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| ConnectorError::sink("file", e))?;
        file.flush().await.map_err(|e| ConnectorError::sink("file", e))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: parking_lot::Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn write(&self, event: Event) -> Result<(), ConnectorError> {
        self.events.lock().push(event);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

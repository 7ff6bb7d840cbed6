//! Event output configuration

use serde::Deserialize;

/// Where emitted events are written
///
/// # Example
///
/// ```toml
/// [output]
/// type = "file"
/// path = "data/events.jsonl"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputConfig {
    /// JSON lines on stdout (default)
    #[default]
    Stdout,
    /// JSON lines appended to a file
    File {
        #[serde(default)]
        path: String,
    },
}

impl OutputConfig {
    /// Output type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::File { .. } => "file",
        }
    }
}

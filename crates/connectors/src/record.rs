//! Records fetched from the source API and the events derived from them

use serde::Serialize;
use serde_json::Value;

use crate::error::ConnectorError;

/// Field carrying the record's event time (and checkpoint candidate)
pub const EVENT_TIME_FIELD: &str = "run_started_at";

/// Category label attached to every emitted event
pub const SOURCETYPE: &str = "github:workflow_runs";

/// One workflow run as returned by the API
///
/// The payload is kept opaque; only the event time field is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    payload: Value,
}

impl Record {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Raw event time string as sent by the API
    pub fn created_at(&self) -> Result<&str, ConnectorError> {
        self.payload
            .get(EVENT_TIME_FIELD)
            .and_then(Value::as_str)
            .ok_or(ConnectorError::MissingTimestamp {
                field: EVENT_TIME_FIELD,
            })
    }

    /// Serialize the record back to compact JSON
    pub fn to_json(&self) -> Result<String, ConnectorError> {
        Ok(serde_json::to_string(&self.payload)?)
    }
}

impl From<Value> for Record {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

/// Output unit handed to an event sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Serialized record
    pub data: String,
    /// Epoch seconds
    pub time: f64,
    /// Destination index
    pub index: String,
    /// Category label
    pub sourcetype: String,
}

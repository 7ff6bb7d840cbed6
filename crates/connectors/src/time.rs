//! Timestamp normalization
//!
//! The source API reports times as ISO-8601 strings with a trailing `Z`.
//! They are always interpreted as UTC: an explicit offset is honoured and a
//! naive value (no marker, as written by older checkpoints) is taken as UTC
//! rather than host-local time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::time::Duration;

use crate::error::ConnectorError;

/// Parse a source or checkpoint timestamp as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ConnectorError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    // Date-only boundaries are accepted by the runs API, so accept them here too
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| ConnectorError::invalid_timestamp(value, "out of range")),
        Err(e) => Err(ConnectorError::invalid_timestamp(value, e)),
    }
}

/// Convert a parsed timestamp to fractional epoch seconds
pub fn epoch_seconds(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / 1000.0
}

/// Parse and convert in one step (the event time of a record)
pub fn to_epoch_seconds(value: &str) -> Result<f64, ConnectorError> {
    parse_timestamp(value).map(|dt| epoch_seconds(&dt))
}

/// Format a timestamp the way checkpoints are written
pub fn format_checkpoint(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// First-run boundary: `now - lookback`
pub fn default_boundary(now: DateTime<Utc>, lookback: Duration) -> String {
    let lookback = chrono::Duration::from_std(lookback).unwrap_or(chrono::Duration::days(1));
    format_checkpoint(now - lookback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zulu_timestamp() {
        let dt = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_parse_ignores_host_timezone() {
        // Same instant whether or not the marker is present
        let zulu = parse_timestamp("2024-03-10T12:30:45Z").unwrap();
        let naive = parse_timestamp("2024-03-10T12:30:45").unwrap();
        assert_eq!(zulu, naive);
    }

    #[test]
    fn test_parse_with_offset() {
        let dt = parse_timestamp("2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(dt.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_timestamp("2024-01-01T00:00:00.250").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_704_067_200_250);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(dt.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_parse_invalid() {
        let result = parse_timestamp("yesterday");
        assert!(matches!(result, Err(ConnectorError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_to_epoch_seconds() {
        assert_eq!(to_epoch_seconds("1970-01-01T00:01:00Z").unwrap(), 60.0);
        assert_eq!(to_epoch_seconds("1970-01-01T00:00:01.500Z").unwrap(), 1.5);
    }

    #[test]
    fn test_format_checkpoint_round_trips() {
        let dt = parse_timestamp("2024-05-06T07:08:09.123Z").unwrap();
        let formatted = format_checkpoint(dt);
        assert_eq!(formatted, "2024-05-06T07:08:09.123Z");
        assert_eq!(parse_timestamp(&formatted).unwrap(), dt);
    }

    #[test]
    fn test_default_boundary_is_one_lookback_earlier() {
        let now = parse_timestamp("2024-01-02T00:00:00Z").unwrap();
        let boundary = default_boundary(now, Duration::from_secs(86_400));
        assert_eq!(boundary, "2024-01-01T00:00:00.000Z");
    }
}

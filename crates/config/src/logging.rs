//! `[log]` section
//!
//! Diagnostics go to stderr unless told otherwise, since the stdout output
//! writes one JSON event per line and a log line there would corrupt the
//! stream. Validation rejects `output = "stdout"` while events also go to
//! stdout.

use serde::Deserialize;

/// Crates whose debug output is request-level noise for a poller
const QUIET_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "rustls"];

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    /// One line per cycle and checkpoint (default)
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    /// One JSON object per line, for log shippers
    Json,
}

/// Where diagnostics are written
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Only usable with `[output] type = "file"`
    Stdout,
    #[default]
    Stderr,
    /// Append to this path, parent directories are created
    #[serde(untagged)]
    File(String),
}

/// Logging configuration
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "/var/log/runwatch/runwatch.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
}

impl LogConfig {
    /// Filter directive for `level` (a `--log-level` value or the configured
    /// level) with the HTTP client stack held at `warn`
    ///
    /// Explicit directives for those crates in `level` win over the defaults.
    pub fn filter_directive(&self, level: Option<&str>) -> String {
        let level = level.unwrap_or_else(|| self.level.as_str());
        let mut directive = level.to_string();
        for target in QUIET_TARGETS {
            let explicit = level
                .split(',')
                .any(|part| part.split('=').next().map(str::trim) == Some(*target));
            if !explicit {
                directive.push_str(&format!(",{}=warn", target));
            }
        }
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, ConfigError};
    use std::str::FromStr;

    #[test]
    fn test_defaults_keep_stdout_for_events() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.log.format, LogFormat::Console);
        assert_eq!(config.log.output, LogOutput::Stderr);
    }

    #[test]
    fn test_log_section_in_config() {
        let config = Config::from_str(
            r#"
[log]
level = "debug"
format = "json"
output = "/var/log/runwatch/runwatch.log"
"#,
        )
        .unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(
            config.log.output,
            LogOutput::File("/var/log/runwatch/runwatch.log".into())
        );
    }

    #[test]
    fn test_stdout_logs_need_file_output() {
        let err = Config::from_str("[log]\noutput = \"stdout\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "output", .. }));

        let config = Config::from_str(
            "[log]\noutput = \"stdout\"\n\n[output]\ntype = \"file\"\npath = \"events.jsonl\"",
        )
        .unwrap();
        assert_eq!(config.log.output, LogOutput::Stdout);
    }

    #[test]
    fn test_filter_directive_quiets_http_stack() {
        let log = LogConfig {
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        assert_eq!(
            log.filter_directive(None),
            "debug,h2=warn,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
        );
    }

    #[test]
    fn test_filter_directive_cli_level_wins() {
        let directive = LogConfig::default().filter_directive(Some("trace,reqwest=debug"));
        assert!(directive.starts_with("trace,reqwest=debug,"));
        assert!(!directive.contains("reqwest=warn"));
        assert!(directive.contains("hyper=warn"));
    }

    #[test]
    fn test_unknown_level_rejected() {
        assert!(Config::from_str("[log]\nlevel = \"verbose\"").is_err());
    }
}

//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering: `event`, `severity`, `ts`, then fields
//!   alphabetically
//! - Synchronous, no buffering
//! - `Error` and `Fatal` go to stderr, everything else to stdout

use std::fmt;
use std::io::{self, Write};

use chrono::Utc;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::format_line(severity, event, fields);
        if severity >= Severity::Error {
            let _ = writeln!(io::stderr(), "{}", line);
        } else {
            let _ = writeln!(io::stdout(), "{}", line);
        }
    }

    /// Shortcut for `Info` events
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Shortcut for `Warn` events
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Shortcut for `Error` events
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Builds one JSON line with deterministic key ordering
    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<(&str, &str)> = fields.to_vec();
        sorted.sort_by_key(|(k, _)| *k);

        let mut out = String::with_capacity(128);
        out.push('{');
        push_pair(&mut out, "event", event);
        out.push(',');
        push_pair(&mut out, "severity", severity.as_str());
        out.push(',');
        push_pair(&mut out, "ts", &Utc::now().to_rfc3339());
        for (key, value) in sorted {
            out.push(',');
            push_pair(&mut out, key, value);
        }
        out.push('}');
        out
    }
}

/// Appends an escaped `"key":"value"` pair
fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(&serde_json::to_string(key).unwrap_or_else(|_| "\"?\"".into()));
    out.push(':');
    out.push_str(&serde_json::to_string(value).unwrap_or_else(|_| "\"?\"".into()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Error < Severity::Fatal);
        assert_eq!(Severity::Warn.as_str(), "WARN");
    }

    #[test]
    fn line_is_valid_json_with_event_first() {
        let line = Logger::format_line(Severity::Info, "command.applied", &[("module", "incidents"), ("id", "INC-001")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "command.applied");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["module"], "incidents");
        assert!(line.starts_with("{\"event\""));
    }

    #[test]
    fn fields_sorted_alphabetically() {
        let line = Logger::format_line(Severity::Info, "e", &[("zebra", "1"), ("alpha", "2")]);
        let zebra = line.find("zebra").unwrap();
        let alpha = line.find("alpha").unwrap();
        assert!(alpha < zebra);
    }

    #[test]
    fn values_are_escaped() {
        let line = Logger::format_line(Severity::Warn, "e", &[("msg", "said \"hi\"\nbye")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "said \"hi\"\nbye");
    }
}

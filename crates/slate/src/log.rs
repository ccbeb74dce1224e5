//! Injected structured logging
//!
//! Components never log through a process-wide singleton: each constructor
//! takes a shared [`Logger`] and emits structured messages through it. The
//! default implementation forwards to `tracing`; tests inject a
//! [`RecordingLogger`] to assert on the emitted sequence.

use std::fmt;
use std::sync::Mutex;

/// Structured logger injected into every component.
///
/// `fields` are key/value pairs attached to the message, rendered as
/// `key=value` by the default sink.
pub trait Logger: Send + Sync {
    fn info(&self, msg: &str, fields: &[(&str, String)]);
    fn warn(&self, msg: &str, fields: &[(&str, String)]);
    fn error(&self, msg: &str, fields: &[(&str, String)]);
}

/// Default logger that forwards to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: &str, fields: &[(&str, String)]) {
        tracing::info!("{}", render(msg, fields));
    }

    fn warn(&self, msg: &str, fields: &[(&str, String)]) {
        tracing::warn!("{}", render(msg, fields));
    }

    fn error(&self, msg: &str, fields: &[(&str, String)]) {
        tracing::error!("{}", render(msg, fields));
    }
}

fn render(msg: &str, fields: &[(&str, String)]) -> String {
    if fields.is_empty() {
        return msg.to_string();
    }
    let joined = fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{msg} {joined}")
}

/// Severity of a recorded log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One entry captured by a [`RecordingLogger`]
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Look up a field value by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Logger that records entries in memory for later inspection.
///
/// Used by tests to verify what was logged and in which order.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Messages only, in recording order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    fn record(&self, level: LogLevel, msg: &str, fields: &[(&str, String)]) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                level,
                message: msg.to_string(),
                fields: fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });
        }
    }
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str, fields: &[(&str, String)]) {
        self.record(LogLevel::Info, msg, fields);
    }

    fn warn(&self, msg: &str, fields: &[(&str, String)]) {
        self.record(LogLevel::Warn, msg, fields);
    }

    fn error(&self, msg: &str, fields: &[(&str, String)]) {
        self.record(LogLevel::Error, msg, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_without_fields() {
        assert_eq!(render("hello", &[]), "hello");
    }

    #[test]
    fn render_with_fields() {
        let fields = [("path", "/tmp/x".to_string()), ("count", "3".to_string())];
        assert_eq!(render("copied", &fields), "copied path=/tmp/x count=3");
    }

    #[test]
    fn recording_logger_captures_order_and_level() {
        let logger = RecordingLogger::new();
        logger.info("first", &[]);
        logger.warn("second", &[("reason", "missing".to_string())]);
        logger.error("third", &[]);

        let entries = logger.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].level, LogLevel::Warn);
        assert_eq!(entries[1].field("reason"), Some("missing"));
        assert_eq!(entries[2].level, LogLevel::Error);
        assert_eq!(logger.messages(), vec!["first", "second", "third"]);
    }
}

//! [`SimLogger`] implementations.

use crate::SimLogger;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

/// A single log line with its simulation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub time: Duration,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        };
        write!(f, "[{}] [t={:?}] {}", level, self.time, self.message)
    }
}

/// Forwards simulation logs to `tracing`.
///
/// Info records become `info!` events and error records become `error!`
/// events, each with a `sim_time` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SimLogger for TracingLogger {
    fn info(&self, time: Duration, message: &str) {
        tracing::info!(sim_time = ?time, "{}", message);
    }

    fn error(&self, time: Duration, message: &str) {
        tracing::error!(sim_time = ?time, "{}", message);
    }
}

/// Keeps every record in memory for later display.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of all records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Get the messages of all error records.
    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|r| r.level == LogLevel::Error)
            .map(|r| r.message.clone())
            .collect()
    }

    /// Check whether any record's message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|r| r.message.contains(needle))
    }

    /// Discard all records.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, level: LogLevel, time: Duration, message: &str) {
        tracing::debug!(sim_time = ?time, ?level, "{}", message);
        self.lock().push(LogRecord {
            level,
            time,
            message: message.to_string(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SimLogger for RecordingLogger {
    fn info(&self, time: Duration, message: &str) {
        self.push(LogLevel::Info, time, message);
    }

    fn error(&self, time: Duration, message: &str) {
        self.push(LogLevel::Error, time, message);
    }
}

//! Splunk-style `key=value` line logger
//!
//! Every line starts with the positional fields `time`, `level` and (when the
//! logger has one) `name`, followed by the message fields:
//!
//! ```text
//! time=2026-10-19T12:00:00.000Z, level=info, name="svc", msg="started", pid="42"
//! ```
//!
//! Values are JSON-quoted strings, except nested objects and arrays which are
//! written inline as compact JSON.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::error::LogResult;
use super::level::Level;
use super::message::{FieldValue, Message};
use super::sink::{LineSink, StdoutSink};
use super::traits::Logger;

/// Keys owned by the positional fields; message fields with these names are dropped
pub const RESERVED_FIELDS: [&str; 3] = ["name", "level", "time"];

/// Line-oriented structured logger
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lambda_tools_core::logging::{Fields, KeyValueLogger, Level, MemorySink};
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = KeyValueLogger::new(Some("svc"), Level::Info).with_sink(sink.clone());
///
/// logger.info(Fields::new().with("msg", "started").with("pid", 42));
/// logger.debug("dropped");
///
/// let line = sink.last().unwrap();
/// assert!(line.ends_with(r#"level=info, name="svc", msg="started", pid="42""#));
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Clone)]
pub struct KeyValueLogger {
    name: Option<String>,
    threshold: Level,
    sink: Arc<dyn LineSink>,
}

impl Default for KeyValueLogger {
    fn default() -> Self {
        Self::new(None::<String>, Level::Info)
    }
}

impl fmt::Debug for KeyValueLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueLogger")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl KeyValueLogger {
    /// Create a logger writing to stdout
    pub fn new(name: Option<impl Into<String>>, threshold: Level) -> Self {
        Self {
            name: name.map(Into::into),
            threshold,
            sink: Arc::new(StdoutSink),
        }
    }

    /// Create a logger from a textual threshold such as `"info"`
    pub fn from_names(name: Option<&str>, threshold: &str) -> LogResult<Self> {
        Ok(Self::new(name, threshold.parse()?))
    }

    /// Send lines somewhere other than stdout
    pub fn with_sink(mut self, sink: Arc<dyn LineSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        self.threshold
    }

    /// Change the minimum level by name; an unknown name leaves the level untouched
    pub fn set_level(&mut self, level: &str) -> LogResult<&mut Self> {
        self.threshold = level.parse()?;
        Ok(self)
    }

    /// Whether a record at `level` would be written
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    /// Render a line stamped with the current time, or `None` below the threshold
    pub fn format(&self, message: &Message, level: Level) -> Option<String> {
        self.format_at(message, level, Utc::now())
    }

    /// Render a line stamped with `time`
    pub fn format_at(&self, message: &Message, level: Level, time: DateTime<Utc>) -> Option<String> {
        if !self.enabled(level) {
            return None;
        }

        let mut line = format!(
            "time={}, level={}",
            time.to_rfc3339_opts(SecondsFormat::Millis, true),
            level
        );
        if let Some(name) = &self.name {
            push_text(&mut line, "name", name);
        }

        match message {
            Message::Text(text) | Message::Error(text) => push_text(&mut line, "msg", text),
            Message::Fields(fields) => {
                for (key, value) in fields.iter() {
                    if RESERVED_FIELDS.contains(&key) {
                        continue;
                    }
                    match value {
                        FieldValue::Text(text) => push_text(&mut line, key, text),
                        FieldValue::Nested(nested) => {
                            line.push_str(&format!(", {}={}", key, nested));
                        }
                    }
                }
            }
        }

        Some(line)
    }

    /// Emit a record; a no-op below the threshold
    pub fn log(&self, message: impl Into<Message>, level: Level) {
        if let Some(line) = self.format(&message.into(), level) {
            self.sink.write_line(&line);
        }
    }

    /// Emit a record at a level given by name
    pub fn log_at(&self, message: impl Into<Message>, level: &str) -> LogResult<()> {
        let level: Level = level.parse()?;
        self.log(message, level);
        Ok(())
    }

    pub fn debug(&self, message: impl Into<Message>) {
        self.log(message, Level::Debug);
    }

    pub fn info(&self, message: impl Into<Message>) {
        self.log(message, Level::Info);
    }

    pub fn warn(&self, message: impl Into<Message>) {
        self.log(message, Level::Warn);
    }

    pub fn error(&self, message: impl Into<Message>) {
        self.log(message, Level::Error);
    }
}

impl Logger for KeyValueLogger {
    fn debug(&self, message: &str) {
        self.log(message, Level::Debug);
    }

    fn info(&self, message: &str) {
        self.log(message, Level::Info);
    }

    fn warn(&self, message: &str) {
        self.log(message, Level::Warn);
    }

    fn error(&self, message: &str) {
        self.log(message, Level::Error);
    }
}

fn push_text(line: &mut String, key: &str, text: &str) {
    // Display on a JSON string value quotes and escapes it
    line.push_str(&format!(", {}={}", key, Value::String(text.to_string())));
}

//! Output format configuration for log events
//!
//! Provides different line formats for sinks that write text:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools
//!
//! All formats resolve duplicate properties with last-write-wins and keep the
//! rendered message on a single line.

use super::attributes::FieldValue;
use super::event::{LogEvent, MESSAGE_TEMPLATE_PROPERTY};
use super::exception::LogException;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Output format for log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INF] Request processed ApplicationId=app-1`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFORMATION","message":"Request processed"}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFORMATION message="Request processed"`
    Logfmt,
}

impl OutputFormat {
    /// Format an event as one line, without the trailing newline
    pub fn format(&self, event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(event, timestamp_format),
            OutputFormat::Json => format_json(event, timestamp_format),
            OutputFormat::Logfmt => format_logfmt(event, timestamp_format),
        }
    }
}

/// Properties other than the message template, resolved
fn extra_properties(event: &LogEvent) -> impl Iterator<Item = (&str, &FieldValue)> {
    event
        .properties
        .resolved()
        .into_iter()
        .filter(|(key, _)| *key != MESSAGE_TEMPLATE_PROPERTY)
}

fn format_text(event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
    format_text_with_level(event, timestamp_format, event.severity.short_name())
}

/// Text line with a caller-supplied level tag, e.g. a colored one
pub(crate) fn format_text_with_level(
    event: &LogEvent,
    timestamp_format: &TimestampFormat,
    level: &str,
) -> String {
    let mut line = format!(
        "[{}] [{}] {}",
        timestamp_format.format(&event.timestamp),
        level,
        single_line(&event.render())
    );

    for (key, value) in extra_properties(event) {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&single_line(&value.to_string()));
    }

    if let Some(ref exception) = event.exception {
        line.push_str(" | ");
        line.push_str(&single_line(&exception.to_string()));
    }

    line
}

fn format_json(event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
    let mut json_obj = serde_json::Map::new();

    let timestamp = match timestamp_format {
        TimestampFormat::Unix => serde_json::Value::Number(event.timestamp.timestamp().into()),
        TimestampFormat::UnixMillis => {
            serde_json::Value::Number(event.timestamp.timestamp_millis().into())
        }
        _ => serde_json::Value::String(timestamp_format.format(&event.timestamp)),
    };
    json_obj.insert("timestamp".to_string(), timestamp);
    json_obj.insert(
        "level".to_string(),
        serde_json::Value::String(event.severity.to_str().to_string()),
    );
    json_obj.insert(
        "message".to_string(),
        serde_json::Value::String(event.render()),
    );

    let mut properties = serde_json::Map::new();
    for (key, value) in event.properties.resolved() {
        properties.insert(key.to_string(), value.to_json_value());
    }
    json_obj.insert(
        "properties".to_string(),
        serde_json::Value::Object(properties),
    );

    if let Some(ref exception) = event.exception {
        json_obj.insert("exception".to_string(), exception_json(exception));
    }

    serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
}

fn exception_json(exception: &LogException) -> serde_json::Value {
    let frames: Vec<serde_json::Value> = exception
        .frames()
        .iter()
        .map(|frame| serde_json::Value::String(frame.describe()))
        .collect();

    let mut obj = serde_json::Map::new();
    obj.insert(
        "kind".to_string(),
        serde_json::Value::String(exception.kind().to_string()),
    );
    obj.insert(
        "message".to_string(),
        serde_json::Value::String(exception.message().to_string()),
    );
    obj.insert("frames".to_string(), serde_json::Value::Array(frames));
    if let Some(source) = exception.source_exception() {
        obj.insert("source".to_string(), exception_json(source));
    }
    serde_json::Value::Object(obj)
}

fn format_logfmt(event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            escape_logfmt_value(&timestamp_format.format(&event.timestamp))
        ),
        format!("level={}", event.severity.to_str()),
        // always quoted
        format!("message={}", quote_logfmt_value(&event.render())),
    ];

    for (key, value) in extra_properties(event) {
        let formatted_value = match value {
            FieldValue::String(s) => quote_logfmt_value(s),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Null => "null".to_string(),
        };
        parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
    }

    if let Some(ref exception) = event.exception {
        parts.push(format!(
            "exception={}",
            quote_logfmt_value(&exception.to_string())
        ));
    }

    parts.join(" ")
}

/// Replace characters that are not allowed in a logfmt key
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Quote a logfmt value if it contains spaces or special characters
fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!(
        "\"{}\"",
        single_line(&value.replace('\\', "\\\\").replace('"', "\\\""))
    )
}

/// Escape line breaks so one event stays on one line
fn single_line(value: &str) -> String {
    value.replace('\r', "\\r").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::Attributes;
    use crate::core::severity::Severity;
    use chrono::Local;

    fn event(severity: Severity, message: &str, extra: Attributes) -> LogEvent {
        let mut properties = Attributes::new().with(MESSAGE_TEMPLATE_PROPERTY, message);
        properties.extend(extra);
        LogEvent {
            severity,
            timestamp: Local::now(),
            exception: None,
            properties,
        }
    }

    #[test]
    fn test_text_format() {
        let event = event(Severity::Information, "Test message", Attributes::new());
        let result = OutputFormat::Text.format(&event, &TimestampFormat::Iso8601);

        assert!(result.contains("[INF]"));
        assert!(result.ends_with("Test message"));
        assert!(!result.contains(MESSAGE_TEMPLATE_PROPERTY));
    }

    #[test]
    fn test_text_format_with_properties() {
        let event = event(
            Severity::Information,
            "User logged in",
            Attributes::new()
                .with("user_id", 123)
                .with("action", "login")
                .with("user_id", 456),
        );
        let result = OutputFormat::Text.format(&event, &TimestampFormat::Iso8601);

        assert!(result.contains("User logged in"));
        assert!(result.contains("user_id=456"));
        assert!(!result.contains("user_id=123"));
        assert!(result.contains("action=login"));
    }

    #[test]
    fn test_text_format_escapes_newlines() {
        let event = event(Severity::Warning, "line one\nline two", Attributes::new());
        let result = OutputFormat::Text.format(&event, &TimestampFormat::Iso8601);

        assert!(!result.contains('\n'));
        assert!(result.contains("line one\\nline two"));
    }

    #[test]
    fn test_json_format() {
        let event = event(
            Severity::Error,
            "Error occurred",
            Attributes::new()
                .with("request_id", "abc-123")
                .with("latency_ms", 42),
        );
        let result = OutputFormat::Json.format(&event, &TimestampFormat::Iso8601);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "Error occurred");
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["properties"]["request_id"], "abc-123");
        assert_eq!(parsed["properties"]["latency_ms"], 42);
    }

    #[test]
    fn test_json_numeric_timestamp_and_exception() {
        let mut event = event(Severity::Fatal, "crash", Attributes::new());
        event.exception = Some(
            LogException::new("disk full").with_source(LogException::new("write failed")),
        );
        let result = OutputFormat::Json.format(&event, &TimestampFormat::UnixMillis);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(parsed["timestamp"].is_number());
        assert_eq!(parsed["exception"]["message"], "disk full");
        assert_eq!(parsed["exception"]["source"]["message"], "write failed");
    }

    #[test]
    fn test_logfmt_format() {
        let event = event(
            Severity::Debug,
            "Debug info",
            Attributes::new().with("user", "alice").with("count", 5),
        );
        let result = OutputFormat::Logfmt.format(&event, &TimestampFormat::Iso8601);

        assert!(result.contains("level=DEBUG"));
        assert!(result.contains("message=\"Debug info\""));
        assert!(result.contains("user=\"alice\""));
        assert!(result.contains("count=5"));
    }

    #[test]
    fn test_logfmt_keys_and_values_are_escaped() {
        let event = event(
            Severity::Error,
            "Query executed",
            Attributes::new()
                .with("query", "SELECT * FROM users WHERE id=1")
                .with("stack trace error list index-0", "first\nsecond"),
        );
        let result = OutputFormat::Logfmt.format(&event, &TimestampFormat::Iso8601);

        assert!(result.contains("query=\"SELECT * FROM users WHERE id=1\""));
        assert!(result.contains("stack_trace_error_list_index-0=\"first\\nsecond\""));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}

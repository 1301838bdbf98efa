//! Record enrichment
//!
//! Turns a [`Record`] into a [`LogEvent`] by attaching the process metadata
//! captured at construction and the reserved per-event properties.

use super::attributes::Attributes;
use super::event::{LogEvent, MESSAGE_TEMPLATE_PROPERTY};
use super::exception::{LogException, StackFrame};
use super::record::Record;
use super::severity::Severity;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::env;

pub const HOST_NAME_PROPERTY: &str = "hostName";
pub const USER_NAME_PROPERTY: &str = "EnvironmentUserName";
pub const DOMAIN_PROPERTY: &str = "Domain";
pub const APPLICATION_ID_PROPERTY: &str = "ApplicationId";
pub const APPLICATION_NAME_PROPERTY: &str = "ApplicationName";
pub const EVENT_OCCURRED_TIME_PROPERTY: &str = "EventOccurredTime";
pub const TIMESPAN_PROPERTY: &str = "Timespan";
pub const STACK_TRACE_PROPERTY_PREFIX: &str = "stack trace error list index-";

/// How the stack trace properties are filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackTraceMode {
    /// Each property holds only its own frame
    #[default]
    PerFrame,
    /// Property `i` holds frames `0..=i`, one per line
    Cumulative,
}

#[derive(Debug, Clone)]
pub struct Enricher {
    application_id: String,
    application_name: String,
    host_name: String,
    user_name: String,
    stack_trace_mode: StackTraceMode,
}

impl Enricher {
    /// Capture the process metadata once
    pub fn new(application_id: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            application_name: application_name.into(),
            host_name: detect_host_name(),
            user_name: detect_user_name(),
            stack_trace_mode: StackTraceMode::default(),
        }
    }

    #[must_use]
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    #[must_use]
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    #[must_use]
    pub fn with_stack_trace_mode(mut self, mode: StackTraceMode) -> Self {
        self.stack_trace_mode = mode;
        self
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn stack_trace_mode(&self) -> StackTraceMode {
        self.stack_trace_mode
    }

    /// Produce the event for `record`, with `now` as the enrichment time
    pub fn enrich(&self, record: Record, now: DateTime<Local>) -> LogEvent {
        let frame_count = match (&record.exception, record.capture_stack_trace) {
            (Some(exception), true) => exception.frames().len(),
            _ => 0,
        };
        let mut properties = Attributes::with_capacity(8 + record.attributes.len() + frame_count);

        self.push_metadata(&mut properties);
        properties.push(MESSAGE_TEMPLATE_PROPERTY, record.message_template);
        properties.extend(record.attributes);
        properties.push(
            EVENT_OCCURRED_TIME_PROPERTY,
            TimestampFormat::EventTime.format(&record.timestamp),
        );
        properties.push(TIMESPAN_PROPERTY, TimestampFormat::Rfc3339Micros.format(&now));

        if record.capture_stack_trace {
            if let Some(exception) = &record.exception {
                self.push_stack_trace(&mut properties, exception.frames());
            }
        }

        LogEvent {
            severity: record.severity,
            timestamp: record.timestamp,
            exception: record.exception,
            properties,
        }
    }

    /// The single `Error` event emitted when writing an event failed
    pub fn failure_event(&self, reason: &str, now: DateTime<Local>) -> LogEvent {
        let message = format!(
            "Error occurred while writing log event. ErrorMessage: {}",
            reason
        );
        let mut properties = Attributes::with_capacity(8);
        self.push_metadata(&mut properties);
        properties.push(MESSAGE_TEMPLATE_PROPERTY, message);
        properties.push(
            EVENT_OCCURRED_TIME_PROPERTY,
            TimestampFormat::EventTime.format(&now),
        );
        properties.push(TIMESPAN_PROPERTY, TimestampFormat::Rfc3339Micros.format(&now));

        LogEvent {
            severity: Severity::Error,
            timestamp: now,
            exception: Some(LogException::new(reason).with_kind("LogEmissionError")),
            properties,
        }
    }

    fn push_metadata(&self, properties: &mut Attributes) {
        properties.push(HOST_NAME_PROPERTY, self.host_name.as_str());
        properties.push(USER_NAME_PROPERTY, self.user_name.as_str());
        properties.push(DOMAIN_PROPERTY, self.application_name.as_str());
        properties.push(APPLICATION_ID_PROPERTY, self.application_id.as_str());
        properties.push(APPLICATION_NAME_PROPERTY, self.application_name.as_str());
    }

    fn push_stack_trace(&self, properties: &mut Attributes, frames: &[StackFrame]) {
        let mut cumulative = String::new();
        for (i, frame) in frames.iter().enumerate() {
            let line = frame.describe();
            let value = match self.stack_trace_mode {
                StackTraceMode::PerFrame => line,
                StackTraceMode::Cumulative => {
                    cumulative.push_str(&line);
                    cumulative.push('\n');
                    cumulative.clone()
                }
            };
            properties.push(format!("{}{}", STACK_TRACE_PROPERTY_PREFIX, i), value);
        }
    }
}

/// Host name from the environment, then `/etc/hostname`, then "unknown"
pub fn detect_host_name() -> String {
    for var in ["HOSTNAME", "COMPUTERNAME"] {
        if let Ok(name) = env::var(var) {
            if !name.is_empty() {
                return name;
            }
        }
    }

    if let Ok(contents) = std::fs::read_to_string("/etc/hostname") {
        let name = contents.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    "unknown".to_string()
}

/// Current user name from the environment, or "unknown"
pub fn detect_user_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

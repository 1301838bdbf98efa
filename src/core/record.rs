//! Log record structure

use super::attributes::Attributes;
use super::exception::LogException;
use super::severity::Severity;
use chrono::{DateTime, Local};
use std::time::Instant;

/// One logging call's payload before enrichment
#[derive(Debug, Clone)]
pub struct Record {
    pub severity: Severity,
    pub message_template: String,
    pub attributes: Attributes,
    pub exception: Option<LogException>,
    pub capture_stack_trace: bool,
    /// Logical event time, taken when the log call is made
    pub timestamp: DateTime<Local>,
    /// Set by the queued logger when the record enters the queue
    pub enqueued_at: Option<Instant>,
}

impl Record {
    pub fn new(severity: Severity, message_template: impl Into<String>) -> Self {
        Self {
            severity,
            message_template: message_template.into(),
            attributes: Attributes::new(),
            exception: None,
            capture_stack_trace: false,
            timestamp: Local::now(),
            enqueued_at: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<super::attributes::FieldValue>,
    {
        self.attributes.push(key, value);
        self
    }

    pub fn with_exception(mut self, exception: LogException) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_stack_trace(mut self, capture: bool) -> Self {
        self.capture_stack_trace = capture;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build a record from the optional arguments of the logging contract
    pub(crate) fn from_call(
        severity: Severity,
        message_template: &str,
        attributes: Option<Attributes>,
        exception: Option<LogException>,
        capture_stack_trace: bool,
    ) -> Self {
        let mut record = Self::new(severity, message_template);
        if let Some(attributes) = attributes {
            record.attributes = attributes;
        }
        record.exception = exception;
        record.capture_stack_trace = capture_stack_trace;
        record
    }

    pub(crate) fn mark_enqueued(&mut self) {
        self.enqueued_at = Some(Instant::now());
    }

    /// Time spent waiting in the queue so far
    pub fn queue_latency(&self) -> Option<std::time::Duration> {
        self.enqueued_at.map(|at| at.elapsed())
    }
}

//! Enriched log event handed to sinks

use super::attributes::{Attributes, FieldValue};
use super::exception::LogException;
use super::severity::Severity;
use chrono::{DateTime, Local};

/// Rendering template used for every emitted event
///
/// Only this placeholder is substituted, so the caller's template text is
/// never interpolated with attribute values.
pub const RENDERING_TEMPLATE: &str = "{MessageTemplate}";

/// Property carrying the caller's message template
pub const MESSAGE_TEMPLATE_PROPERTY: &str = "MessageTemplate";

/// A record after enrichment
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub exception: Option<LogException>,
    pub properties: Attributes,
}

impl LogEvent {
    pub fn rendering_template(&self) -> &'static str {
        RENDERING_TEMPLATE
    }

    /// Resolved value of a property (last write wins)
    pub fn property(&self, key: &str) -> Option<&FieldValue> {
        self.properties.get(key)
    }

    /// Text of the event as a sink would display it
    pub fn render(&self) -> String {
        self.property(MESSAGE_TEMPLATE_PROPERTY)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// The caller's message template as submitted
    pub fn message_template(&self) -> Option<&str> {
        self.property(MESSAGE_TEMPLATE_PROPERTY)
            .and_then(FieldValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(properties: Attributes) -> LogEvent {
        LogEvent {
            severity: Severity::Information,
            timestamp: Local::now(),
            exception: None,
            properties,
        }
    }

    #[test]
    fn test_render_uses_message_template_verbatim() {
        let event = event(
            Attributes::new()
                .with(MESSAGE_TEMPLATE_PROPERTY, "User {UserId} logged in")
                .with("UserId", 42),
        );
        assert_eq!(event.render(), "User {UserId} logged in");
        assert_eq!(event.rendering_template(), "{MessageTemplate}");
    }

    #[test]
    fn test_property_last_write_wins() {
        let event = event(Attributes::new().with("Region", "eu").with("Region", "us"));
        assert_eq!(event.property("Region"), Some(&FieldValue::from("us")));
    }

    #[test]
    fn test_render_without_template_is_empty() {
        assert_eq!(event(Attributes::new()).render(), "");
    }
}

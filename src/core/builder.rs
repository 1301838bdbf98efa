//! Fluent construction of synchronous and queued loggers

use super::{
    config::{DeliveryMode, LogSettings, SinkConfig},
    enricher::{Enricher, StackTraceMode},
    error::{LoggerError, Result},
    log::Log,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    queued_logger::{QueueConfig, QueuedLogger},
    severity::Severity,
    sink::Sink,
    sync_logger::SyncLogger,
};
use std::sync::Arc;
use std::time::Duration;

/// Entry point for building loggers
///
/// # Example
/// ```
/// use rust_log_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .application("app-1", "Orders")
///     .min_level(Severity::Debug)
///     .sink(NullSink)
///     .build_queued()
///     .unwrap();
/// logger.debug("ready", None, None);
/// ```
pub struct Logger;

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

type Parts = (
    Enricher,
    Box<dyn Sink>,
    Severity,
    QueueConfig,
    Option<OverflowCallback>,
);

/// Builder for constructing loggers with a fluent API
///
/// # Example
/// ```
/// use rust_log_facade::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .application("app-1", "Orders")
///     .sink(MemorySink::new())
///     .capacity(10_000)
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} records dropped", count);
///     }))
///     .build_queued()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    application_id: String,
    application_name: String,
    host_name: Option<String>,
    user_name: Option<String>,
    sink: Option<Box<dyn Sink>>,
    min_level: Severity,
    stack_trace_mode: StackTraceMode,
    queue: QueueConfig,
    on_overflow: Option<OverflowCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            application_id: String::new(),
            application_name: String::new(),
            host_name: None,
            user_name: None,
            sink: None,
            min_level: Severity::default(),
            stack_trace_mode: StackTraceMode::default(),
            queue: QueueConfig::default(),
            on_overflow: None,
        }
    }

    /// Set the application identity reported on every event
    #[must_use = "builder methods return a new value"]
    pub fn application(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.application_id = id.into();
        self.application_name = name.into();
        self
    }

    /// Override the detected host name
    #[must_use = "builder methods return a new value"]
    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Override the detected user name
    #[must_use = "builder methods return a new value"]
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Set the sink; the console sink is used if none is given
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set minimum severity
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_trace_mode(mut self, mode: StackTraceMode) -> Self {
        self.stack_trace_mode = mode;
        self
    }

    /// Bound the queue; it is unbounded unless this is called
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.queue.capacity = Some(capacity);
        self
    }

    /// Set the policy for a full queue
    ///
    /// Only takes effect together with [`LoggerBuilder::capacity`].
    /// Default is `AlertAndDrop`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_facade::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .application("app-1", "Orders")
    ///     .sink(NullSink)
    ///     .capacity(100)
    ///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
    ///     .build_queued()
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.queue.overflow_policy = policy;
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// The parameter is the total count of dropped records.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// How often the queue is rotated; at most [`MAX_MAINTENANCE_INTERVAL`]
    ///
    /// [`MAX_MAINTENANCE_INTERVAL`]: crate::core::MAX_MAINTENANCE_INTERVAL
    #[must_use = "builder methods return a new value"]
    pub fn rotation_interval(mut self, interval: Duration) -> Self {
        self.queue.rotation_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reclaim_interval(mut self, interval: Duration) -> Self {
        self.queue.reclaim_interval = interval;
        self
    }

    /// Records written between sink flushes
    #[must_use = "builder methods return a new value"]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.queue.batch_size = batch_size;
        self
    }

    /// Apply a loaded settings file, building its sink
    pub fn settings(mut self, settings: &LogSettings) -> Result<Self> {
        self.min_level = settings.min_level;
        self.stack_trace_mode = settings.stack_trace_mode;
        self.queue = settings.queue.clone();
        self.sink = Some(settings.sink.build()?);
        Ok(self)
    }

    fn into_parts(self) -> Result<Parts> {
        if self.application_name.is_empty() {
            return Err(LoggerError::config(
                "LoggerBuilder",
                "application name must be set",
            ));
        }

        let mut enricher = Enricher::new(self.application_id, self.application_name)
            .with_stack_trace_mode(self.stack_trace_mode);
        if let Some(host_name) = self.host_name {
            enricher = enricher.with_host_name(host_name);
        }
        if let Some(user_name) = self.user_name {
            enricher = enricher.with_user_name(user_name);
        }

        let sink = match self.sink {
            Some(sink) => sink,
            None => SinkConfig::default().build()?,
        };

        Ok((enricher, sink, self.min_level, self.queue, self.on_overflow))
    }

    /// Build a logger that writes on the calling thread
    pub fn build_sync(self) -> Result<SyncLogger> {
        let (enricher, sink, min_level, _, _) = self.into_parts()?;
        Ok(SyncLogger::with_sink(enricher, sink, min_level))
    }

    /// Build a logger backed by the queue and a drain worker
    pub fn build_queued(self) -> Result<QueuedLogger> {
        let (enricher, sink, min_level, queue, on_overflow) = self.into_parts()?;
        QueuedLogger::start(enricher, sink, min_level, queue, on_overflow)
    }

    /// Build either kind behind a shared handle
    pub fn build(self, delivery: DeliveryMode) -> Result<Arc<dyn Log>> {
        Ok(match delivery {
            DeliveryMode::Synchronous => Arc::new(self.build_sync()?),
            DeliveryMode::Queued => Arc::new(self.build_queued()?),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enricher::{APPLICATION_ID_PROPERTY, HOST_NAME_PROPERTY};
    use crate::sinks::MemorySink;

    #[test]
    fn test_builder_requires_application() {
        let result = Logger::builder().sink(MemorySink::new()).build_sync();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_builder_sync_with_overrides() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .application("app-7", "Billing")
            .host_name("build-host")
            .user_name("svc")
            .min_level(Severity::Information)
            .sink(sink.clone())
            .build_sync()
            .unwrap();

        logger.debug("filtered", None, None);
        logger.warning("kept", None, None);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].property(HOST_NAME_PROPERTY).and_then(|v| v.as_str()),
            Some("build-host")
        );
        assert_eq!(
            events[0].property(APPLICATION_ID_PROPERTY).and_then(|v| v.as_str()),
            Some("app-7")
        );
    }

    #[test]
    fn test_builder_queued() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .application("app-7", "Billing")
            .sink(sink.clone())
            .capacity(128)
            .batch_size(8)
            .build_queued()
            .unwrap();

        for i in 0..30 {
            logger.information(&format!("m{}", i), None, None);
        }
        logger.flush();

        assert_eq!(sink.len(), 30);
        assert_eq!(logger.metrics().dropped_count(), 0);
    }

    #[test]
    fn test_builder_rejects_invalid_queue() {
        let result = Logger::builder()
            .application("id", "app")
            .sink(MemorySink::new())
            .batch_size(0)
            .build_queued();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_unbounded_maintenance_interval() {
        let result = Logger::builder()
            .application("id", "app")
            .sink(MemorySink::new())
            .rotation_interval(Duration::MAX)
            .build_queued();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));

        let result = Logger::builder()
            .application("id", "app")
            .sink(MemorySink::new())
            .reclaim_interval(Duration::MAX)
            .build_queued();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_by_delivery_mode() {
        for delivery in [DeliveryMode::Synchronous, DeliveryMode::Queued] {
            let sink = MemorySink::new();
            let logger = Logger::builder()
                .application("id", "app")
                .sink(sink.clone())
                .build(delivery)
                .unwrap();

            logger.error("failed", None, None, false);
            logger.flush();
            assert_eq!(sink.len(), 1, "{:?}", delivery);
        }
    }

    #[test]
    fn test_settings_override_builder_values() {
        let settings = LogSettings {
            min_level: Severity::Error,
            sink: SinkConfig::Null,
            ..Default::default()
        };
        let logger = Logger::builder()
            .application("id", "app")
            .settings(&settings)
            .unwrap()
            .build_sync()
            .unwrap();
        assert_eq!(logger.min_level(), Severity::Error);
    }
}

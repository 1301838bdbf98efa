//! Core logger types and traits

pub mod attributes;
pub mod builder;
pub mod config;
pub mod enricher;
pub mod error;
pub mod event;
pub mod exception;
pub mod log;
pub mod metrics;
pub mod output_format;
pub mod overflow_policy;
pub(crate) mod pipeline;
pub(crate) mod queue;
pub mod queued_logger;
pub mod record;
pub mod severity;
pub mod sink;
pub mod sync_logger;
pub mod timestamp;

pub use attributes::{Attributes, FieldValue};
pub use builder::{Logger, LoggerBuilder};
pub use config::{DeliveryMode, LogSettings, LoggerConfig, SinkConfig, DEFAULT_SETTINGS_FILE};
pub use enricher::{Enricher, StackTraceMode};
pub use error::{LoggerError, Result};
pub use event::LogEvent;
pub use exception::{LogException, StackFrame};
pub use log::Log;
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use queued_logger::{
    QueueConfig, QueuedLogger, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_TIMEOUT,
    DEFAULT_MAINTENANCE_INTERVAL, DEFAULT_SHUTDOWN_TIMEOUT, MAX_MAINTENANCE_INTERVAL,
};
pub use record::Record;
pub use severity::Severity;
pub use sink::Sink;
pub use sync_logger::SyncLogger;
pub use timestamp::TimestampFormat;

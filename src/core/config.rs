//! Logger configuration
//!
//! [`LogSettings`] is the optional JSON settings file (`LogConfiguration.json`
//! by default). [`LoggerConfig`] combines it with the application identity and
//! the delivery mode, and is the single entry point an application uses to
//! obtain a shared [`Log`] handle.

use super::{
    builder::LoggerBuilder,
    enricher::StackTraceMode,
    error::{LoggerError, Result},
    log::Log,
    output_format::OutputFormat,
    queued_logger::QueueConfig,
    severity::Severity,
    sink::Sink,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings file looked up when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "LogConfiguration.json";

/// Whether log calls write directly or go through the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMode {
    Synchronous,
    #[default]
    Queued,
}

/// Which reference sink to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SinkConfig {
    Console {
        #[serde(default = "default_colors")]
        colors: bool,
        #[serde(default)]
        format: OutputFormat,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        format: OutputFormat,
        #[serde(default)]
        timestamp_format: TimestampFormat,
    },
    Null,
}

fn default_colors() -> bool {
    true
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::Console {
            colors: default_colors(),
            format: OutputFormat::default(),
        }
    }
}

impl SinkConfig {
    /// Construct the configured sink
    pub fn build(&self) -> Result<Box<dyn Sink>> {
        match self {
            #[cfg(feature = "console")]
            SinkConfig::Console { colors, format } => Ok(Box::new(
                crate::sinks::ConsoleSink::new()
                    .with_colors(*colors)
                    .with_format(*format),
            )),
            #[cfg(not(feature = "console"))]
            SinkConfig::Console { .. } => Err(LoggerError::config(
                "sink",
                "console sink requires the `console` feature",
            )),
            #[cfg(feature = "file")]
            SinkConfig::File {
                path,
                format,
                timestamp_format,
            } => Ok(Box::new(
                crate::sinks::FileSink::new(path)?
                    .with_format(*format)
                    .with_timestamp_format(timestamp_format.clone()),
            )),
            #[cfg(not(feature = "file"))]
            SinkConfig::File { .. } => Err(LoggerError::config(
                "sink",
                "file sink requires the `file` feature",
            )),
            SinkConfig::Null => Ok(Box::new(crate::sinks::NullSink)),
        }
    }
}

/// Contents of the settings file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub min_level: Severity,
    pub sink: SinkConfig,
    pub queue: QueueConfig,
    pub stack_trace_mode: StackTraceMode,
}

impl LogSettings {
    /// Load settings from a JSON file, or the defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading settings",
                format!("cannot read {}", path.display()),
                e,
            )
        })?;
        Self::from_json(&content)
            .map_err(|e| LoggerError::config(path.display().to_string(), e.to_string()))
    }

    /// Parse settings from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(content)?;
        settings.queue.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Application identity plus where to find the settings
///
/// # Example
///
/// ```no_run
/// use rust_log_facade::prelude::*;
///
/// let logger = LoggerConfig::new("app-1", "Orders")
///     .delivery(DeliveryMode::Queued)
///     .build()
///     .expect("logger");
/// logger.information("Service started", None, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub application_id: String,
    pub application_name: String,
    pub delivery: DeliveryMode,
    /// `None` looks for [`DEFAULT_SETTINGS_FILE`] in the working directory
    pub settings_path: Option<PathBuf>,
}

impl LoggerConfig {
    pub fn new(application_id: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            application_name: application_name.into(),
            delivery: DeliveryMode::default(),
            settings_path: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Load the settings and construct the logger
    pub fn build(&self) -> Result<Arc<dyn Log>> {
        let path = self
            .settings_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let settings = LogSettings::load(&path)?;

        LoggerBuilder::new()
            .application(self.application_id.clone(), self.application_name.clone())
            .settings(&settings)?
            .build(self.delivery)
    }
}

/// Serde helper storing a `Duration` as whole milliseconds
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

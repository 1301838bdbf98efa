//! # Rust Log Facade
//!
//! An application logging facade that enriches every record with process
//! metadata before handing it to a pluggable sink.
//!
//! ## Features
//!
//! - **Two delivery modes**: write on the calling thread, or enqueue and let a
//!   background worker drain the queue
//! - **Queue maintenance**: periodic content-preserving rotation and memory
//!   reclamation, with no busy waiting
//! - **Failure isolation**: sink errors and panics become a single fallback
//!   event and never reach the caller
//! - **Structured attributes**: ordered, duplicates allowed, last write wins
//!
//! ## Example
//!
//! ```
//! use rust_log_facade::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .application("app-1", "Orders")
//!     .sink(sink.clone())
//!     .build_queued()
//!     .unwrap();
//!
//! logger.information("Order {OrderId} placed", Some(attrs!["OrderId" => 42]), None);
//! logger.error(
//!     "Payment failed",
//!     None,
//!     Some(LogException::new("card declined")),
//!     true,
//! );
//! logger.flush();
//!
//! assert_eq!(sink.len(), 2);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::attrs;
    pub use crate::core::{
        Attributes, DeliveryMode, Enricher, FieldValue, Log, LogEvent, LogException, LogSettings,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat,
        OverflowCallback, OverflowPolicy, QueuedLogger, Record, Result, Severity, Sink,
        SinkConfig, StackFrame, StackTraceMode, SyncLogger, TimestampFormat,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::{MemorySink, NullSink};
}

pub use crate::core::{
    Attributes, DeliveryMode, Enricher, FieldValue, Log, LogEvent, LogException, LogSettings,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat,
    OverflowCallback, OverflowPolicy, QueueConfig, QueuedLogger, Record, Result, Severity, Sink,
    SinkConfig, StackFrame, StackTraceMode, SyncLogger, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
#[cfg(feature = "console")]
pub use crate::sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use crate::sinks::FileSink;
pub use crate::sinks::{MemorySink, NullSink};

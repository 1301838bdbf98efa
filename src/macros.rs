//! Logging macros for attaching attributes inline.
//!
//! The message template is passed through as written; attribute values are
//! never interpolated into it.
//!
//! # Examples
//!
//! ```
//! use rust_log_facade::prelude::*;
//! use rust_log_facade::{attrs, information};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .application("app-1", "Orders")
//!     .sink(sink.clone())
//!     .build_sync()
//!     .unwrap();
//!
//! // Basic logging
//! information!(logger, "Server started");
//!
//! // With attributes
//! information!(logger, "Order {OrderId} placed", "OrderId" => 42, "Region" => "eu");
//!
//! // Building attributes for the method API
//! logger.warning("Slow request", Some(attrs!["ElapsedMs" => 1200]), None);
//! assert_eq!(sink.len(), 3);
//! ```

/// Build an [`Attributes`](crate::core::Attributes) list, keeping order and duplicates.
///
/// # Examples
///
/// ```
/// use rust_log_facade::attrs;
///
/// let attributes = attrs!["user" => "alice", "attempt" => 2, "user" => "bob"];
/// assert_eq!(attributes.len(), 3);
/// assert_eq!(attributes.get("user").and_then(|v| v.as_str()), Some("bob"));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::core::Attributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::core::Attributes::new()$(.with($key, $value))+
    };
}

/// Log at an explicit severity.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().application("id", "app").sink(NullSink).build_sync().unwrap();
/// use rust_log_facade::log;
/// log!(logger, Severity::Information, "Simple message");
/// log!(logger, Severity::Error, "Request failed", "Status" => 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::core::Log::submit(
            &$logger,
            $crate::core::Record::new($level, $template)$(.with_attribute($key, $value))*,
        )
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().application("id", "app").sink(NullSink).build_sync().unwrap();
/// use rust_log_facade::debug;
/// debug!(logger, "Cache refreshed", "Entries" => 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Debug, $($arg)+)
    };
}

/// Log an information-level message.
#[macro_export]
macro_rules! information {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Information, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().application("id", "app").sink(NullSink).build_sync().unwrap();
/// use rust_log_facade::warning;
/// warning!(logger, "Low disk space");
/// warning!(logger, "Retry attempt", "Attempt" => 3, "Max" => 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// Use [`Log::error`](crate::core::Log::error) to attach an exception or a
/// stack trace.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Fatal, $($arg)+)
    };
}

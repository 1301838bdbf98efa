//! Error values attached to log records
//!
//! `LogException` is an owned, clonable snapshot of an error: its kind, message,
//! source chain and the stack frames that were captured for it. Frames come from
//! the construction site (`#[track_caller]`), from an explicit
//! [`LogException::with_frame`] call, or from a full backtrace capture.

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

/// One stack frame of a captured exception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub method: Option<String>,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, line: u32, method: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            method: Some(method.into()),
        }
    }

    pub(crate) fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: Some(location.file().to_string()),
            line: Some(location.line()),
            method: None,
        }
    }

    /// Human readable description used for the stack trace attributes
    pub fn describe(&self) -> String {
        format!(
            "the error has occurred in file line number -> {} in file name -> {} in method name -> {}",
            self.line.unwrap_or(0),
            self.file.as_deref().unwrap_or(""),
            self.method.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogException {
    kind: String,
    message: String,
    frames: Vec<StackFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Box<LogException>>,
}

impl LogException {
    /// Create an exception whose single frame is the caller's location
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: "Error".to_string(),
            message: message.into(),
            frames: vec![StackFrame::from_location(Location::caller())],
            source: None,
        }
    }

    /// Snapshot an error value and its `source()` chain
    #[track_caller]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut exception = Self::new(error.to_string()).with_kind(short_type_name::<E>());
        exception.source = error.source().map(|s| Box::new(Self::from_source(s)));
        exception
    }

    fn from_source(error: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            kind: "Error".to_string(),
            message: error.to_string(),
            frames: Vec::new(),
            source: error.source().map(|s| Box::new(Self::from_source(s))),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: LogException) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Append an explicit frame
    #[must_use]
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Replace the frames with a freshly captured backtrace
    ///
    /// Keeps the existing frames if the platform yields nothing usable.
    #[must_use]
    pub fn with_backtrace(mut self) -> Self {
        let captured = parse_backtrace(&Backtrace::force_capture().to_string());
        if !captured.is_empty() {
            self.frames = captured;
        }
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn source_exception(&self) -> Option<&LogException> {
        self.source.as_deref()
    }
}

impl fmt::Display for LogException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        let mut source = self.source.as_deref();
        while let Some(inner) = source {
            write!(f, " ---> {}: {}", inner.kind, inner.message)?;
            source = inner.source.as_deref();
        }
        Ok(())
    }
}

impl std::error::Error for LogException {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Parse the textual form of `std::backtrace::Backtrace`
///
/// Frames look like `  3: crate::module::function` optionally followed by an
/// `at path/to/file.rs:12:5` line. Frames belonging to the capture machinery
/// itself are skipped.
pub(crate) fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.file.is_none() {
                    let (file, line_no) = split_location(location);
                    frame.file = Some(file);
                    frame.line = line_no;
                }
            }
            continue;
        }

        let Some((index, method)) = trimmed.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        frames.push(StackFrame {
            file: None,
            line: None,
            method: Some(method.to_string()),
        });
    }

    frames.retain(|frame| {
        let method = frame.method.as_deref().unwrap_or("");
        !(method.starts_with("std::backtrace")
            || method.starts_with("<std::backtrace")
            || method.contains("LogException::with_backtrace"))
    });
    frames
}

fn split_location(location: &str) -> (String, Option<u32>) {
    // path:line:column, the path itself may contain ':' on Windows
    let mut parts = location.rsplitn(3, ':');
    let _column = parts.next();
    let line = parts.next().and_then(|l| l.parse().ok());
    match (line, parts.next()) {
        (Some(line), Some(file)) => (file.to_string(), Some(line)),
        _ => (location.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_new_records_caller_location() {
        let exception = LogException::new("boom");
        assert_eq!(exception.frames().len(), 1);
        let frame = &exception.frames()[0];
        assert!(frame.file.as_deref().unwrap().ends_with("exception.rs"));
        assert!(frame.line.unwrap() > 0);
    }

    #[test]
    fn test_from_error_keeps_source_chain() {
        let exception = LogException::from_error(&Outer(Inner));
        assert_eq!(exception.kind(), "Outer");
        assert_eq!(exception.message(), "request failed");
        let source = exception.source_exception().expect("source");
        assert_eq!(source.message(), "connection reset");
        assert_eq!(
            exception.to_string(),
            "Outer: request failed ---> Error: connection reset"
        );
    }

    #[test]
    fn test_frame_description() {
        let frame = StackFrame::new("src/orders.rs", 42, "orders::submit");
        assert_eq!(
            frame.describe(),
            "the error has occurred in file line number -> 42 in file name -> src/orders.rs in method name -> orders::submit"
        );
    }

    #[test]
    fn test_parse_backtrace_text() {
        let text = "   0: std::backtrace::Backtrace::force_capture\n             at /rustc/library/std/src/backtrace.rs:310:13\n   1: app::orders::submit\n             at ./src/orders.rs:42:9\n   2: app::main\n             at ./src/main.rs:7:5\n   3: core::ops::function::FnOnce::call_once\n";
        let frames = parse_backtrace(text);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].method.as_deref(), Some("app::orders::submit"));
        assert_eq!(frames[0].file.as_deref(), Some("./src/orders.rs"));
        assert_eq!(frames[0].line, Some(42));
        assert_eq!(frames[1].line, Some(7));
        assert_eq!(frames[2].file, None);
    }

    #[test]
    fn test_split_location_windows_path() {
        let (file, line) = split_location(r"C:\src\main.rs:12:5");
        assert_eq!(file, r"C:\src\main.rs");
        assert_eq!(line, Some(12));
    }
}

//! File sink implementation
//!
//! Lines are buffered and written out on [`Sink::flush`], which the drain
//! worker calls once per batch. The file holds an advisory exclusive lock
//! while a flush is in progress so several processes can share one log file.

use crate::core::{LogEvent, LoggerError, OutputFormat, Result, Sink, TimestampFormat};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Capacity kept by the line buffer after [`Sink::compact`]
const LINE_BUFFER_BASELINE: usize = 512;

pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    line: String,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directory if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    parent.display().to_string(),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            line: String::with_capacity(LINE_BUFFER_BASELINE),
            timestamp_format: TimestampFormat::EventTime,
            output_format: OutputFormat::default(),
        })
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_log_facade::sinks::FileSink;
    /// use rust_log_facade::TimestampFormat;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn emit(&mut self, event: &LogEvent) -> Result<()> {
        self.line.clear();
        self.line
            .push_str(&self.output_format.format(event, &self.timestamp_format));
        self.line.push('\n');

        self.writer.write_all(self.line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let file = self.writer.get_ref();
        FileExt::lock_exclusive(file).map_err(|e| {
            LoggerError::io_operation("locking log file", self.path.display().to_string(), e)
        })?;

        let flushed = self.writer.flush();
        let unlocked = FileExt::unlock(self.writer.get_ref());

        flushed?;
        unlocked?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn compact(&mut self) {
        self.line.shrink_to(LINE_BUFFER_BASELINE);
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Enricher, Record, Severity};
    use chrono::Local;
    use tempfile::TempDir;

    fn event(message: &str) -> LogEvent {
        Enricher::new("id", "app").enrich(Record::new(Severity::Information, message), Local::now())
    }

    #[test]
    fn test_lines_appear_after_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let mut sink = FileSink::new(&path).unwrap();

        sink.emit(&event("first")).unwrap();
        sink.emit(&event("second")).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("first"));
        assert!(lines[1].contains("second"));
    }

    #[test]
    fn test_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.json");
        let mut sink = FileSink::new(&path).unwrap().with_format(OutputFormat::Json);

        sink.emit(&event("structured")).unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["message"], "structured");
        assert_eq!(parsed["properties"]["ApplicationName"], "app");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing\n").unwrap();

        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.emit(&event("appended")).unwrap();
            sink.compact();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing\n"));
        assert!(content.contains("appended"));
    }
}

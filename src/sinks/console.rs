//! Console sink implementation

use crate::core::output_format::format_text_with_level;
use crate::core::{LogEvent, OutputFormat, Result, Severity, Sink, TimestampFormat};
use colored::Colorize;

pub struct ConsoleSink {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::EventTime,
            output_format: OutputFormat::default(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_facade::sinks::ConsoleSink;
    /// use rust_log_facade::OutputFormat;
    ///
    /// let sink = ConsoleSink::new().with_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn format_line(&self, event: &LogEvent) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => {
                let level = event
                    .severity
                    .short_name()
                    .color(event.severity.color_code())
                    .to_string();
                format_text_with_level(event, &self.timestamp_format, &level)
            }
            format => format.format(event, &self.timestamp_format),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, event: &LogEvent) -> Result<()> {
        let output = self.format_line(event);

        // Route Error and Fatal to stderr, others to stdout
        match event.severity {
            Severity::Error | Severity::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

//! Logging contract shared by the synchronous and queued loggers

use super::{attributes::Attributes, exception::LogException, record::Record, severity::Severity};
use std::sync::Arc;

/// One method per severity, plus the record-level [`Log::submit`]
///
/// Implementors only provide `submit`. None of the methods report failures:
/// problems while enriching or writing are handled inside the logger.
///
/// # Example
///
/// ```
/// use rust_log_facade::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .application("app-1", "Orders")
///     .sink(sink.clone())
///     .build_sync()
///     .unwrap();
///
/// logger.information("Order placed", Some(attrs!["OrderId" => 42]), None);
/// assert_eq!(sink.len(), 1);
/// ```
pub trait Log: Send + Sync {
    /// Hand a fully built record to the logger
    fn submit(&self, record: Record);

    /// Best-effort flush of everything logged so far
    fn flush(&self) {}

    fn verbose(
        &self,
        template: &str,
        attributes: Option<Attributes>,
        exception: Option<LogException>,
    ) {
        self.submit(Record::from_call(
            Severity::Verbose,
            template,
            attributes,
            exception,
            false,
        ));
    }

    fn debug(&self, template: &str, attributes: Option<Attributes>, exception: Option<LogException>) {
        self.submit(Record::from_call(
            Severity::Debug,
            template,
            attributes,
            exception,
            false,
        ));
    }

    fn information(
        &self,
        template: &str,
        attributes: Option<Attributes>,
        exception: Option<LogException>,
    ) {
        self.submit(Record::from_call(
            Severity::Information,
            template,
            attributes,
            exception,
            false,
        ));
    }

    fn warning(
        &self,
        template: &str,
        attributes: Option<Attributes>,
        exception: Option<LogException>,
    ) {
        self.submit(Record::from_call(
            Severity::Warning,
            template,
            attributes,
            exception,
            false,
        ));
    }

    /// Log an error; with `capture_stack_trace` the exception's frames are
    /// added as `stack trace error list index-{i}` properties
    fn error(
        &self,
        template: &str,
        attributes: Option<Attributes>,
        exception: Option<LogException>,
        capture_stack_trace: bool,
    ) {
        self.submit(Record::from_call(
            Severity::Error,
            template,
            attributes,
            exception,
            capture_stack_trace,
        ));
    }

    fn fatal(&self, template: &str, attributes: Option<Attributes>, exception: Option<LogException>) {
        self.submit(Record::from_call(
            Severity::Fatal,
            template,
            attributes,
            exception,
            false,
        ));
    }
}

impl<T: Log + ?Sized> Log for &T {
    fn submit(&self, record: Record) {
        (**self).submit(record)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

impl<T: Log + ?Sized> Log for Box<T> {
    fn submit(&self, record: Record) {
        (**self).submit(record)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

impl<T: Log + ?Sized> Log for Arc<T> {
    fn submit(&self, record: Record) {
        (**self).submit(record)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<Record>>);

    impl Log for Capture {
        fn submit(&self, record: Record) {
            self.0.lock().push(record);
        }
    }

    #[test]
    fn test_severity_methods() {
        let log = Capture::default();
        log.verbose("v", None, None);
        log.debug("d", None, None);
        log.information("i", None, None);
        log.warning("w", None, None);
        log.error("e", None, None, true);
        log.fatal("f", None, None);

        let records = log.0.lock();
        let severities: Vec<Severity> = records.iter().map(|r| r.severity).collect();
        assert_eq!(severities, Severity::ALL.to_vec());
        assert!(records[4].capture_stack_trace);
        assert!(!records[5].capture_stack_trace);
    }

    #[test]
    fn test_forwarding_impls() {
        let log = Arc::new(Capture::default());
        let shared: Arc<dyn Log> = log.clone();
        shared.information("through arc", Some(Attributes::new().with("k", 1)), None);
        (&*shared).warning("through ref", None, None);
        let boxed: Box<dyn Log> = Box::new(Arc::clone(&log));
        boxed.debug("through box", None, None);

        let records = log.0.lock();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].attributes.len(), 1);
        assert_eq!(records[2].message_template, "through box");
    }
}

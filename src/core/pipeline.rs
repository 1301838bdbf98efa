//! Enrich-and-forward routine shared by both delivery modes
//!
//! **Failure isolation**: enrichment and the sink call run inside
//! `catch_unwind`. An error or panic is turned into one fallback `Error` event
//! written to the same sink; if that fails as well it is counted and dropped.

use super::{
    enricher::Enricher, error::Result, event::LogEvent, metrics::LoggerMetrics, record::Record,
    sink::Sink,
};
use chrono::Local;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub(crate) struct Pipeline {
    enricher: Enricher,
    sink: Mutex<Box<dyn Sink>>,
    metrics: Arc<LoggerMetrics>,
}

impl Pipeline {
    pub(crate) fn new(enricher: Enricher, sink: Box<dyn Sink>, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            enricher,
            sink: Mutex::new(sink),
            metrics,
        }
    }

    pub(crate) fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    /// Enrich, write and flush `record` before returning
    ///
    /// A flush failure counts as a failed write and produces the fallback event.
    pub(crate) fn dispatch_flushed(&self, record: Record) {
        let mut sink = self.sink.lock();
        self.dispatch_to(&mut **sink, record, true);
    }

    /// Dispatch a batch in order while holding the sink once
    pub(crate) fn dispatch_batch<I>(&self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        let mut sink = self.sink.lock();
        for record in records {
            self.dispatch_to(&mut **sink, record, false);
        }
    }

    fn dispatch_to(&self, sink: &mut dyn Sink, record: Record, flush: bool) {
        let enricher = &self.enricher;
        let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<()> {
            let event = enricher.enrich(record, Local::now());
            sink.emit(&event)?;
            if flush {
                sink.flush()?;
            }
            Ok(())
        }));

        match outcome {
            Ok(Ok(())) => {
                self.metrics.record_emitted();
            }
            Ok(Err(e)) => self.emit_fallback(sink, &e.to_string(), flush),
            Err(panic_info) => self.emit_fallback(sink, &panic_message(panic_info), flush),
        }
    }

    fn emit_fallback(&self, sink: &mut dyn Sink, reason: &str, flush: bool) {
        self.metrics.record_sink_failure();

        let event: LogEvent = self.enricher.failure_event(reason, Local::now());
        let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<()> {
            sink.emit(&event)?;
            if flush {
                sink.flush()?;
            }
            Ok(())
        }));

        if !matches!(outcome, Ok(Ok(()))) {
            self.metrics.record_fallback_failure();
            self.metrics.record_dropped();
        }
    }

    /// Flush the sink, swallowing errors and panics
    pub(crate) fn flush(&self) {
        let mut sink = self.sink.lock();
        match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked during flush: {}",
                    sink.name(),
                    panic_message(panic_info)
                );
            }
        }
    }

    /// Ask the sink to release buffered memory
    pub(crate) fn compact(&self) {
        let mut sink = self.sink.lock();
        let _ = catch_unwind(AssertUnwindSafe(|| sink.compact()));
    }
}

pub(crate) fn panic_message(panic_info: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{error::LoggerError, severity::Severity};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Recording {
        events: Arc<Mutex<Vec<LogEvent>>>,
        fail_on: Option<&'static str>,
        panic_on: Option<&'static str>,
        fail_everything: bool,
        fail_next_flush: Arc<AtomicBool>,
    }

    impl Sink for Recording {
        fn emit(&mut self, event: &LogEvent) -> Result<()> {
            let text = event.render();
            if self.fail_everything || Some(text.as_str()) == self.fail_on {
                return Err(LoggerError::sink("recording", "rejected"));
            }
            if Some(text.as_str()) == self.panic_on {
                panic!("sink exploded");
            }
            self.events.lock().push(event.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            if self.fail_next_flush.swap(false, Ordering::SeqCst) {
                return Err(LoggerError::sink("recording", "flush refused"));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn pipeline(sink: Recording) -> (Pipeline, Arc<LoggerMetrics>) {
        let metrics = Arc::new(LoggerMetrics::new());
        let pipeline = Pipeline::new(
            Enricher::new("id", "app"),
            Box::new(sink),
            Arc::clone(&metrics),
        );
        (pipeline, metrics)
    }

    #[test]
    fn test_dispatch_success() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (pipeline, metrics) = pipeline(Recording {
            events: Arc::clone(&events),
            ..Default::default()
        });

        pipeline.dispatch_flushed(Record::new(Severity::Information, "hello"));

        assert_eq!(events.lock().len(), 1);
        assert_eq!(metrics.total_emitted(), 1);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_sink_error_emits_single_fallback() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (pipeline, metrics) = pipeline(Recording {
            events: Arc::clone(&events),
            fail_on: Some("bad"),
            ..Default::default()
        });

        pipeline.dispatch_flushed(Record::new(Severity::Information, "bad"));

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Error);
        assert!(events[0].render().contains("rejected"));
        assert_eq!(metrics.sink_failures(), 1);
        assert_eq!(metrics.total_emitted(), 0);
    }

    #[test]
    fn test_sink_panic_is_contained() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (pipeline, metrics) = pipeline(Recording {
            events: Arc::clone(&events),
            panic_on: Some("explode"),
            ..Default::default()
        });

        pipeline.dispatch_batch(vec![
            Record::new(Severity::Warning, "explode"),
            Record::new(Severity::Warning, "after"),
        ]);

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert!(events[0].render().contains("sink exploded"));
        assert_eq!(events[1].render(), "after");
        assert_eq!(metrics.sink_failures(), 1);
    }

    #[test]
    fn test_failed_fallback_is_swallowed() {
        let (pipeline, metrics) = pipeline(Recording {
            fail_everything: true,
            ..Default::default()
        });

        pipeline.dispatch_flushed(Record::new(Severity::Fatal, "lost"));

        assert_eq!(metrics.sink_failures(), 1);
        assert_eq!(metrics.fallback_failures(), 1);
        assert_eq!(metrics.dropped_count(), 1);
    }

    #[test]
    fn test_flush_failure_emits_fallback() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (pipeline, metrics) = pipeline(Recording {
            events: Arc::clone(&events),
            fail_next_flush: Arc::new(AtomicBool::new(true)),
            ..Default::default()
        });

        pipeline.dispatch_flushed(Record::new(Severity::Information, "buffered"));

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].severity, Severity::Error);
        assert!(events[1].render().contains("flush refused"));
        assert_eq!(metrics.sink_failures(), 1);
        assert_eq!(metrics.total_emitted(), 0);
        assert_eq!(metrics.fallback_failures(), 0);
    }
}

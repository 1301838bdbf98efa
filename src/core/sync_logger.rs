//! Synchronous logger
//!
//! Every call enriches, writes and flushes on the caller's thread. The call
//! returns once the sink's `emit` and `flush` have returned, so a buffering
//! sink such as `FileSink` has the line on disk by then. A failed flush is
//! reported through the fallback event like a failed write. Callers sharing
//! the logger are serialized on the sink lock.

use super::{
    enricher::Enricher, log::Log, metrics::LoggerMetrics, pipeline::Pipeline, record::Record,
    severity::Severity, sink::Sink,
};
use std::sync::Arc;

pub struct SyncLogger {
    min_level: Severity,
    pipeline: Pipeline,
    metrics: Arc<LoggerMetrics>,
}

impl SyncLogger {
    pub fn new<S: Sink + 'static>(enricher: Enricher, sink: S) -> Self {
        Self::with_sink(enricher, Box::new(sink), Severity::Verbose)
    }

    pub(crate) fn with_sink(enricher: Enricher, sink: Box<dyn Sink>, min_level: Severity) -> Self {
        let metrics = Arc::new(LoggerMetrics::new());
        Self {
            min_level,
            pipeline: Pipeline::new(enricher, sink, Arc::clone(&metrics)),
            metrics,
        }
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    pub fn enricher(&self) -> &Enricher {
        self.pipeline.enricher()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Log for SyncLogger {
    fn submit(&self, record: Record) {
        if record.severity < self.min_level {
            return;
        }
        self.pipeline.dispatch_flushed(record);
    }

    fn flush(&self) {
        self.pipeline.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::core::event::LogEvent;
    use crate::sinks::MemorySink;
    use std::thread;
    use std::time::{Duration, Instant};

    struct SlowSink {
        delay: Duration,
        inner: MemorySink,
    }

    impl Sink for SlowSink {
        fn emit(&mut self, event: &LogEvent) -> Result<()> {
            thread::sleep(self.delay);
            self.inner.emit(event)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn test_call_returns_after_emit() {
        let memory = MemorySink::new();
        let logger = SyncLogger::new(
            Enricher::new("id", "app"),
            SlowSink {
                delay: Duration::from_millis(50),
                inner: memory.clone(),
            },
        );

        let start = Instant::now();
        logger.information("slow write", None, None);

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(memory.len(), 1);
        assert_eq!(logger.metrics().total_emitted(), 1);
    }

    #[test]
    fn test_min_level() {
        let memory = MemorySink::new();
        let logger = SyncLogger::with_sink(
            Enricher::new("id", "app"),
            Box::new(memory.clone()),
            Severity::Information,
        );

        logger.verbose("dropped", None, None);
        logger.debug("dropped", None, None);
        logger.information("kept", None, None);
        logger.fatal("kept", None, None);

        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_shared_between_threads() {
        let memory = MemorySink::new();
        let logger = Arc::new(SyncLogger::new(Enricher::new("id", "app"), memory.clone()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..25 {
                        logger.debug(&format!("t{} m{}", t, i), None, None);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(memory.len(), 100);
    }

    /// Holds events until flushed, like a buffered file
    struct BufferedSink {
        pending: Vec<LogEvent>,
        durable: MemorySink,
    }

    impl Sink for BufferedSink {
        fn emit(&mut self, event: &LogEvent) -> Result<()> {
            self.pending.push(event.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            for event in self.pending.drain(..) {
                self.durable.emit(&event)?;
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "buffered"
        }
    }

    #[test]
    fn test_each_call_is_flushed() {
        let durable = MemorySink::new();
        let logger = SyncLogger::new(
            Enricher::new("id", "app"),
            BufferedSink {
                pending: Vec::new(),
                durable: durable.clone(),
            },
        );

        logger.information("first", None, None);
        assert_eq!(durable.len(), 1);

        logger.warning("second", None, None);
        let rendered: Vec<String> = durable.events().iter().map(|e| e.render()).collect();
        assert_eq!(rendered, vec!["first", "second"]);
    }
}

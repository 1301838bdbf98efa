//! Queued logger and its drain worker
//!
//! Log calls push a [`Record`] onto the [`RecordQueue`] and return. A single
//! named worker thread waits on the queue, enriches and writes records in
//! dequeue order, and periodically runs maintenance:
//!
//! - **rotation**: swap the queue for a fresh one, moving pending records over
//! - **reclamation**: shrink the worker's batch buffer, which grows past the
//!   batch size while a flush or shutdown drains a backlog, and compact the sink
//!
//! The worker never spins: it blocks on the queue and the command channel with
//! a timeout that ends at the next maintenance tick.

use super::{
    enricher::Enricher,
    error::{LoggerError, Result},
    log::Log,
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    pipeline::Pipeline,
    queue::RecordQueue,
    record::Record,
    severity::Severity,
    sink::Sink,
};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time [`Log::flush`] waits for the queue to drain
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default period of queue rotation and memory reclamation (2 minutes)
pub const DEFAULT_MAINTENANCE_INTERVAL: Duration = Duration::from_secs(120);

/// Longest accepted rotation or reclaim interval (1 day)
pub const MAX_MAINTENANCE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default number of records written per sink flush
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Queue and drain worker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// `None` keeps the queue unbounded
    pub capacity: Option<usize>,
    /// Only consulted when a capacity is set
    pub overflow_policy: OverflowPolicy,
    #[serde(rename = "rotation_interval_ms", with = "crate::core::config::duration_ms")]
    pub rotation_interval: Duration,
    #[serde(rename = "reclaim_interval_ms", with = "crate::core::config::duration_ms")]
    pub reclaim_interval: Duration,
    pub batch_size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            overflow_policy: OverflowPolicy::default(),
            rotation_interval: DEFAULT_MAINTENANCE_INTERVAL,
            reclaim_interval: DEFAULT_MAINTENANCE_INTERVAL,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl QueueConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(LoggerError::config("queue", "capacity must be greater than zero"));
        }
        if self.batch_size == 0 {
            return Err(LoggerError::config("queue", "batch_size must be greater than zero"));
        }
        if self.rotation_interval.is_zero() || self.reclaim_interval.is_zero() {
            return Err(LoggerError::config(
                "queue",
                "maintenance intervals must be greater than zero",
            ));
        }
        if self.rotation_interval > MAX_MAINTENANCE_INTERVAL
            || self.reclaim_interval > MAX_MAINTENANCE_INTERVAL
        {
            return Err(LoggerError::config(
                "queue",
                format!(
                    "maintenance intervals must not exceed {:?}",
                    MAX_MAINTENANCE_INTERVAL
                ),
            ));
        }
        Ok(())
    }
}

enum Command {
    /// Write what is queued when the command is handled, flush, then acknowledge
    Flush(Sender<()>),
    /// Drain everything, flush the sink and exit
    Shutdown,
}

pub struct QueuedLogger {
    min_level: Severity,
    queue: Arc<RecordQueue>,
    commands: Sender<Command>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<LoggerMetrics>,
}

impl QueuedLogger {
    /// Start a queued logger with the default queue settings
    pub fn new<S: Sink + 'static>(enricher: Enricher, sink: S) -> Result<Self> {
        Self::start(
            enricher,
            Box::new(sink),
            Severity::Verbose,
            QueueConfig::default(),
            None,
        )
    }

    pub(crate) fn start(
        enricher: Enricher,
        sink: Box<dyn Sink>,
        min_level: Severity,
        config: QueueConfig,
        on_overflow: Option<OverflowCallback>,
    ) -> Result<Self> {
        config.validate()?;

        let metrics = Arc::new(LoggerMetrics::new());
        let queue = Arc::new(RecordQueue::new(
            config.capacity,
            config.overflow_policy.clone(),
            on_overflow,
            Arc::clone(&metrics),
        ));
        let pipeline = Arc::new(Pipeline::new(enricher, sink, Arc::clone(&metrics)));
        let (commands, command_receiver) = unbounded();

        let worker = DrainWorker {
            queue: Arc::clone(&queue),
            pipeline,
            metrics: Arc::clone(&metrics),
            schedule: MaintenanceSchedule::new(
                config.rotation_interval,
                config.reclaim_interval,
                Instant::now(),
            ),
            batch: Vec::with_capacity(config.batch_size),
            batch_size: config.batch_size,
        };

        let handle = thread::Builder::new()
            .name("log-drain".to_string())
            .spawn(move || worker.run(command_receiver))
            .map_err(LoggerError::WorkerSpawn)?;

        Ok(Self {
            min_level,
            queue,
            commands,
            worker: Mutex::new(Some(handle)),
            metrics,
        })
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// Number of records waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_running(&self) -> bool {
        !self.queue.is_closed()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_facade::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .application("app-1", "Orders")
    ///     .sink(NullSink)
    ///     .build_queued()
    ///     .unwrap();
    ///
    /// let metrics = logger.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Rotations: {}", metrics.rotations());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Wait until every record queued before this call has been written
    ///
    /// Returns `false` if the worker did not confirm within `timeout` or has
    /// already stopped.
    pub fn flush_timeout(&self, timeout: Duration) -> bool {
        let (ack, acked) = bounded(1);
        if self.commands.send(Command::Flush(ack)).is_err() {
            return false;
        }
        acked.recv_timeout(timeout).is_ok()
    }

    /// Stop accepting records, drain the queue and stop the worker
    ///
    /// Records logged after this call are counted as dropped. Returns `true`
    /// if the worker finished within `timeout`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_log_facade::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .application("app-1", "Orders")
    ///     .build_queued()
    ///     .unwrap();
    /// logger.information("Important message", None, None);
    ///
    /// if !logger.shutdown(Duration::from_secs(10)) {
    ///     eprintln!("Warning: Logger shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.queue.close();

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };
        let _ = self.commands.send(Command::Shutdown);

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                // Thread finished, join it to check for panics
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Drain worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Drain worker did not finish within {:?}. \
                     {} queued records may be lost.",
                    timeout,
                    self.queue.len()
                );
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Log for QueuedLogger {
    fn submit(&self, mut record: Record) {
        if record.severity < self.min_level {
            return;
        }
        record.mark_enqueued();
        self.queue.push(record);
    }

    fn flush(&self) {
        self.flush_timeout(DEFAULT_FLUSH_TIMEOUT);
    }
}

impl Drop for QueuedLogger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped records (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Timestamps of the last maintenance passes
struct MaintenanceSchedule {
    rotation_interval: Duration,
    reclaim_interval: Duration,
    last_rotation: Instant,
    last_reclaim: Instant,
}

impl MaintenanceSchedule {
    fn new(rotation_interval: Duration, reclaim_interval: Duration, now: Instant) -> Self {
        Self {
            rotation_interval,
            reclaim_interval,
            last_rotation: now,
            last_reclaim: now,
        }
    }

    fn rotation_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_rotation) >= self.rotation_interval
    }

    fn reclaim_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_reclaim) >= self.reclaim_interval
    }

    /// How long the worker may sleep before a maintenance pass is due
    ///
    /// Never longer than [`MAX_MAINTENANCE_INTERVAL`], even for intervals that
    /// do not fit in an `Instant`.
    fn time_until_due(&self, now: Instant) -> Duration {
        let rotation = remaining(self.last_rotation, self.rotation_interval, now);
        let reclaim = remaining(self.last_reclaim, self.reclaim_interval, now);
        rotation.min(reclaim).min(MAX_MAINTENANCE_INTERVAL)
    }
}

fn remaining(last: Instant, interval: Duration, now: Instant) -> Duration {
    match last.checked_add(interval) {
        Some(due) => due.saturating_duration_since(now),
        None => MAX_MAINTENANCE_INTERVAL,
    }
}

enum Step {
    Record(Record),
    Command(Command),
    Reconnect,
    Idle,
}

struct DrainWorker {
    queue: Arc<RecordQueue>,
    pipeline: Arc<Pipeline>,
    metrics: Arc<LoggerMetrics>,
    schedule: MaintenanceSchedule,
    batch: Vec<Record>,
    batch_size: usize,
}

impl DrainWorker {
    fn run(mut self, commands: Receiver<Command>) {
        let mut receiver = self.queue.receiver();

        loop {
            self.run_maintenance(&mut receiver, Instant::now());
            let wait = self.schedule.time_until_due(Instant::now());

            let step = select! {
                recv(receiver) -> record => match record {
                    Ok(record) => Step::Record(record),
                    Err(_) => Step::Reconnect,
                },
                recv(commands) -> command => match command {
                    Ok(command) => Step::Command(command),
                    // every logger handle is gone
                    Err(_) => Step::Command(Command::Shutdown),
                },
                default(wait) => Step::Idle,
            };

            match step {
                Step::Record(record) => {
                    self.batch.push(record);
                    self.fill_batch(&receiver, self.batch_size);
                    self.write_batch();
                }
                Step::Command(Command::Flush(ack)) => {
                    // records logged after this point are left for the loop
                    let pending = receiver.len();
                    self.drain_pending(&receiver, pending);
                    let _ = ack.send(());
                }
                Step::Command(Command::Shutdown) => {
                    self.drain_all(&receiver);
                    break;
                }
                Step::Reconnect => receiver = self.queue.receiver(),
                Step::Idle => {}
            }
        }
    }

    fn run_maintenance(&mut self, receiver: &mut Receiver<Record>, now: Instant) {
        if self.schedule.rotation_due(now) {
            self.queue.rotate();
            *receiver = self.queue.receiver();
            self.schedule.last_rotation = now;
        }

        if self.schedule.reclaim_due(now) {
            self.batch.shrink_to(self.batch_size);
            self.pipeline.compact();
            self.metrics.record_reclaim();
            self.schedule.last_reclaim = now;
        }
    }

    /// Top up the batch to `limit` records without blocking
    fn fill_batch(&mut self, receiver: &Receiver<Record>, limit: usize) {
        while self.batch.len() < limit {
            match receiver.try_recv() {
                Ok(record) => self.batch.push(record),
                Err(_) => break,
            }
        }
    }

    fn write_batch(&mut self) {
        self.pipeline.dispatch_batch(self.batch.drain(..));
        self.pipeline.flush();
    }

    /// Write up to `count` queued records as one batch and flush the sink
    ///
    /// The batch buffer grows to the backlog here; reclamation shrinks it back.
    fn drain_pending(&mut self, receiver: &Receiver<Record>, count: usize) {
        self.fill_batch(receiver, count);
        self.write_batch();
    }

    /// Write everything queued; only terminates once producers are shut out
    fn drain_all(&mut self, receiver: &Receiver<Record>) {
        loop {
            let pending = receiver.len();
            if pending == 0 {
                break;
            }
            self.drain_pending(receiver, pending);
        }
        self.pipeline.flush();
    }
}

//! Rotatable multi-producer record queue
//!
//! Producers hold the shared lock only for one non-blocking `try_send`. The
//! drain worker takes the exclusive lock to swap in a fresh channel and move
//! the pending records over, so a producer always sees either the old or the
//! new channel, never a half-rotated one.

use super::{
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    record::Record,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Pause between attempts while a producer waits for space
const BLOCK_BACKOFF: Duration = Duration::from_millis(1);

/// Evictions tried under `DropOldest` before giving up on the new record
const DROP_OLDEST_ATTEMPTS: usize = 8;

struct Channel {
    sender: Sender<Record>,
    receiver: Receiver<Record>,
}

impl Channel {
    fn new(capacity: Option<usize>) -> Self {
        let (sender, receiver) = match capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };
        Self { sender, receiver }
    }
}

enum PushError {
    Full(Record),
    Closed,
}

pub(crate) struct RecordQueue {
    channel: RwLock<Channel>,
    capacity: Option<usize>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: Arc<LoggerMetrics>,
    closed: AtomicBool,
}

impl RecordQueue {
    pub(crate) fn new(
        capacity: Option<usize>,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            channel: RwLock::new(Channel::new(capacity)),
            capacity,
            overflow_policy,
            on_overflow,
            metrics,
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueue a record; returns whether it was accepted
    pub(crate) fn push(&self, record: Record) -> bool {
        match self.try_push(record) {
            Ok(()) => true,
            Err(PushError::Closed) => {
                self.metrics.record_dropped();
                false
            }
            Err(PushError::Full(record)) => self.handle_overflow(record),
        }
    }

    fn try_push(&self, record: Record) -> Result<(), PushError> {
        let channel = self.channel.read();
        // checked under the lock so close() orders against in-flight pushes
        if self.closed.load(Ordering::Acquire) {
            return Err(PushError::Closed);
        }
        match channel.sender.try_send(record) {
            Ok(()) => {
                self.metrics.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Full(record)) => Err(PushError::Full(record)),
            // the queue owns a receiver, so this cannot happen while it is alive
            Err(TrySendError::Disconnected(_)) => Err(PushError::Closed),
        }
    }

    fn handle_overflow(&self, record: Record) -> bool {
        self.metrics.record_queue_full();

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
                false
            }
            OverflowPolicy::DropOldest => self.push_evicting_oldest(record),
            OverflowPolicy::Block => self.push_blocking(record, None),
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.push_blocking(record, Some(Instant::now() + *timeout))
            }
            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                false
            }
        }
    }

    fn push_evicting_oldest(&self, mut record: Record) -> bool {
        for _ in 0..DROP_OLDEST_ATTEMPTS {
            {
                let channel = self.channel.read();
                if channel.receiver.try_recv().is_ok() {
                    self.metrics.record_dropped();
                }
            }
            match self.try_push(record) {
                Ok(()) => return true,
                Err(PushError::Full(returned)) => record = returned,
                Err(PushError::Closed) => {
                    self.metrics.record_dropped();
                    return false;
                }
            }
        }
        self.alert_and_drop();
        false
    }

    fn push_blocking(&self, mut record: Record, deadline: Option<Instant>) -> bool {
        self.metrics.record_block();

        loop {
            match self.try_push(record) {
                Ok(()) => return true,
                Err(PushError::Full(returned)) => record = returned,
                Err(PushError::Closed) => {
                    self.metrics.record_dropped();
                    return false;
                }
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    self.alert_and_drop();
                    return false;
                }
            }

            thread::sleep(BLOCK_BACKOFF);
        }
    }

    /// Drop a record with alert notification
    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;

        if should_alert {
            eprintln!(
                "[LOGGER WARNING] Queue full, {} records dropped. \
                 Consider increasing the capacity or using a different overflow policy.",
                dropped_count + 1
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    /// Replace the channel with a fresh one, moving pending records over in order
    ///
    /// Returns the number of records moved. Only the drain worker calls this,
    /// and it must fetch a new receiver afterwards.
    pub(crate) fn rotate(&self) -> usize {
        let mut channel = self.channel.write();
        let old = std::mem::replace(&mut *channel, Channel::new(self.capacity));

        let mut moved = 0;
        for record in old.receiver.try_iter() {
            // same capacity and producers are locked out, so this cannot fill up
            match channel.sender.try_send(record) {
                Ok(()) => moved += 1,
                Err(_) => {
                    self.metrics.record_dropped();
                }
            }
        }

        self.metrics.record_rotation();
        moved
    }

    /// Receiver of the current channel
    pub(crate) fn receiver(&self) -> Receiver<Record> {
        self.channel.read().receiver.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.channel.read().receiver.len()
    }

    /// Refuse new records; pushes that already hold the lock complete first
    pub(crate) fn close(&self) {
        let _channel = self.channel.write();
        self.closed.store(true, Ordering::Release);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

//! Overflow policies for bounded queues
//!
//! The queue is unbounded unless a capacity is configured. When a bounded
//! queue is full, the policy decides what happens to the new record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full queue
///
/// # Example
///
/// ```
/// use rust_log_facade::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: alert and drop
/// let policy = OverflowPolicy::default();
///
/// // Block with timeout
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Drop the new record, tracking it in metrics only
    DropNewest,

    /// Evict the oldest queued record to make room for the new one
    DropOldest,

    /// Wait until space is available
    ///
    /// Warning: this puts backpressure on the calling thread.
    Block,

    /// Wait for space up to the timeout, then drop with an alert
    BlockWithTimeout(#[serde(with = "crate::core::config::duration_ms")] Duration),

    /// Drop the new record and alert via callback and stderr
    ///
    /// Alerts fire on the first drop and every 1000th drop thereafter.
    AlertAndDrop,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::AlertAndDrop
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Callback type for overflow notifications
///
/// The parameter is the total count of dropped records so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::DropOldest.to_string(), "DropOldest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
        assert_eq!(OverflowPolicy::AlertAndDrop.to_string(), "AlertAndDrop");
    }

    #[test]
    fn test_overflow_policy_serde() {
        let policy: OverflowPolicy =
            serde_json::from_str(r#"{"BlockWithTimeout":250}"#).expect("deserialize");
        assert_eq!(policy, OverflowPolicy::BlockWithTimeout(Duration::from_millis(250)));

        let policy: OverflowPolicy = serde_json::from_str("\"DropOldest\"").expect("deserialize");
        assert_eq!(policy, OverflowPolicy::DropOldest);
    }
}

//! # Lifecycle events emitted by launchers and the guarded runner.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Wait protocol**: parking, resuming, cancellation and wait timeout
//! - **Task lifecycle**: start, success, failure, graceful stop
//! - **Subscriber plumbing**: per-subscriber overflow and panic reports
//!
//! The [`Event`] struct carries optional metadata such as the task name, a
//! human-readable reason and elapsed wait time.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! processed out of band.
//!
//! ## Example
//! ```rust
//! use netwait::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("fetch-profile")
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("fetch-profile"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of launch lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Wait protocol ===
    /// Launch parked: network unreachable, waiting for the signal.
    ///
    /// Sets: `task`, `at`, `seq`.
    WaitingForNetwork,

    /// Reachability returned; the parked launch is about to run its task.
    ///
    /// Sets: `task`, `elapsed_ms` (time spent parked), `at`, `seq`.
    NetworkResumed,

    /// The wait or the running task was cancelled (scope ended or explicit).
    ///
    /// Sets: `task`, `reason`, `at`, `seq`.
    WaitCancelled,

    /// The wait exceeded its caller-supplied budget and gave up.
    ///
    /// Sets: `task`, `elapsed_ms`, `at`, `seq`.
    WaitTimedOut,

    // === Task lifecycle ===
    /// Task execution is starting.
    ///
    /// Sets: `task`, `at`, `seq`.
    TaskStarting,

    /// Task outcome classified as success.
    ///
    /// Sets: `task`, `at`, `seq`.
    TaskSucceeded,

    /// Task failed (classified non-success, unstructured error, or timeout).
    ///
    /// Sets: `task`, `reason`, `at`, `seq`.
    TaskFailed,

    /// Task stopped without a terminal outcome (cooperative cancellation
    /// observed inside the task).
    ///
    /// Sets: `task`, `reason`, `at`, `seq`.
    TaskStopped,

    // === Subscriber plumbing ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`, `at`, `seq`.
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason` (panic info), `at`, `seq`.
    SubscriberPanicked,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Elapsed wait time in milliseconds (compact).
    pub elapsed_ms: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            elapsed_ms: None,
        }
    }

    /// Attaches a task (or subscriber) name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an elapsed wait duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub(crate) fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// Whether this event reports subscriber overflow.
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskSucceeded);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::new(EventKind::WaitTimedOut)
            .with_task("fetch")
            .with_elapsed(Duration::from_millis(50));
        assert_eq!(ev.task.as_deref(), Some("fetch"));
        assert_eq!(ev.elapsed_ms, Some(50));
    }
}

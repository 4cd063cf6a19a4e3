//! # Wait budget options.
//!
//! [`WaitOptions`] bounds how long a waiting launch may stay parked. While
//! parked, elapsed time is re-checked at each poll tick; exceeding
//! `cancel_timeout` cancels the wait (delivered as cancellation, never as an
//! error) and the launcher does not retry.

use std::time::Duration;

/// `(poll_interval, cancel_timeout)` pair bounding a parked wait.
///
/// The cancellation point lands within one `poll_interval` of the budget.
/// A zero `cancel_timeout` means "no budget": the launch waits for reconnect
/// indefinitely (until its scope ends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    /// How often the parked wait re-checks its elapsed time.
    pub poll_interval: Duration,
    /// Total wait budget; `Duration::ZERO` disables the budget.
    pub cancel_timeout: Duration,
}

impl WaitOptions {
    /// Creates a budgeted wait.
    pub fn new(poll_interval: Duration, cancel_timeout: Duration) -> Self {
        Self {
            poll_interval,
            cancel_timeout,
        }
    }

    /// Returns `self` only when a budget is actually set, with the poll
    /// interval clamped to a minimum of 1ms.
    pub(crate) fn budget(self) -> Option<Self> {
        if self.cancel_timeout == Duration::ZERO {
            None
        } else {
            Some(Self {
                poll_interval: self.poll_interval.max(Duration::from_millis(1)),
                cancel_timeout: self.cancel_timeout,
            })
        }
    }
}

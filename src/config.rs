//! # Launcher configuration.
//!
//! Provides [`Config`] — centralized settings for a [`Launcher`](crate::Launcher).
//!
//! ## Sentinel values
//! - `task_timeout = 0s` → no per-attempt timeout
//! - `cancel_timeout = 0s` → no wait budget (park indefinitely)
//!
//! Prefer the accessors ([`Config::default_task_timeout`],
//! [`Config::wait_options`]) over checking sentinels at call sites.

use std::time::Duration;

use crate::launch::WaitOptions;

/// Settings shared by every launch made through one launcher.
///
/// All fields are public for flexibility.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// observe `Lagged` and skip older items. Minimum value is 1 (clamped).
    pub bus_capacity: usize,

    /// Default per-attempt task timeout.
    ///
    /// - `Duration::ZERO` = no timeout (task runs until completion)
    /// - `> 0` = the attempt is cancelled and `Timeout` delivered to
    ///   `on_error` once exceeded
    pub task_timeout: Duration,

    /// Default poll interval for budgeted waits (see [`WaitOptions`]).
    pub poll_interval: Duration,

    /// Default wait budget for budgeted waits.
    ///
    /// - `Duration::ZERO` = no budget (wait for reconnect indefinitely)
    /// - `> 0` = parked waits give up after this long, delivered as
    ///   cancellation
    pub cancel_timeout: Duration,
}

impl Config {
    /// Returns the per-attempt timeout as an `Option`.
    ///
    /// `None` → no timeout; `Some(d)` → applied per attempt.
    #[inline]
    pub fn default_task_timeout(&self) -> Option<Duration> {
        if self.task_timeout == Duration::ZERO {
            None
        } else {
            Some(self.task_timeout)
        }
    }

    /// Returns the default wait options built from this config.
    ///
    /// Applied by the waiting launchers whenever a launch omits its own
    /// [`WaitOptions`] argument.
    #[inline]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            poll_interval: self.poll_interval,
            cancel_timeout: self.cancel_timeout,
        }
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024` (good baseline)
    /// - `task_timeout = 0s` (no timeout)
    /// - `poll_interval = 500ms`
    /// - `cancel_timeout = 30s`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            task_timeout: Duration::ZERO,
            poll_interval: Duration::from_millis(500),
            cancel_timeout: Duration::from_secs(30),
        }
    }
}

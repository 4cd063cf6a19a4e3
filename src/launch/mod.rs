//! Launchers: the entry points that gate task execution on reachability.
//!
//! ## Contents
//! - [`Launcher`] — shared entry point bound to a [`Registry`] and a [`Bus`];
//!   all launches made through it publish to the same event stream.
//! - [`Launcher::launch_aware`] — fail-fast: runs the task only if a network
//!   is reachable right now, otherwise reports `NoNetwork`.
//! - [`Launcher::launch_waiting`] — parks while unreachable and resumes
//!   exactly once when connectivity returns; optionally scope-bound and
//!   budget-limited.
//! - [`Launcher::launch_waiting_repeating`] — restarts the waiting protocol
//!   each time the bound scope re-enters its active phase.
//! - [`WaitOptions`] — `(poll_interval, cancel_timeout)` budget for waits.

mod aware;
mod options;
mod waiting;

pub use options::WaitOptions;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::connectivity::Registry;
use crate::error::TaskError;
use crate::events::Bus;
use crate::state::{StateCell, TaskState};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Join handle of one launch; resolves to the launch outcome.
///
/// `Err(TaskError::Canceled)` means the launch was cancelled (scope ended,
/// explicit cancel, or wait budget exhausted) — it was never delivered to
/// `on_error`.
pub type LaunchHandle = JoinHandle<Result<(), TaskError>>;

/// Entry point for reachability-gated launches.
///
/// Holds the injected [`Registry`] and the event [`Bus`]. Cheap enough to
/// create per subsystem; launches made through the same launcher share one
/// event stream and one configuration.
pub struct Launcher {
    registry: Arc<Registry>,
    config: Config,
    bus: Bus,
    subscriber_stop: Option<CancellationToken>,
}

impl Launcher {
    /// Creates a launcher without event subscribers.
    pub fn new(registry: Arc<Registry>, config: Config) -> Self {
        let bus = Bus::new(config.bus_capacity_clamped());
        Self {
            registry,
            config,
            bus,
            subscriber_stop: None,
        }
    }

    /// Creates a launcher and wires `subs` to its event stream.
    ///
    /// Spawns the fan-out listener immediately; it stops when the launcher is
    /// dropped.
    pub fn with_subscribers(
        registry: Arc<Registry>,
        config: Config,
        subs: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let mut launcher = Self::new(registry, config);
        let stop = CancellationToken::new();
        let set = SubscriberSet::new(subs, launcher.bus.clone());
        // Detached on purpose; the stop token ends it when the launcher drops.
        let _ = set.spawn_listener(launcher.bus.subscribe(), stop.clone());
        launcher.subscriber_stop = Some(stop);
        launcher
    }

    /// The event stream shared by all launches of this launcher.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The injected reachability registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The launcher configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for Launcher {
    fn drop(&mut self) {
        if let Some(stop) = &self.subscriber_stop {
            stop.cancel();
        }
    }
}

/// Publishes into the optional observed-state sink.
pub(crate) fn publish_state<T>(state: Option<&StateCell<T>>, next: TaskState<T>) {
    if let Some(cell) = state {
        cell.publish(next);
    }
}

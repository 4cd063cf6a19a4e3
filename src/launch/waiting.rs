//! # Waiting launcher: the reachability-gated state machine.
//!
//! If the network is unreachable at launch, the task is not failed — the
//! launch publishes `WaitingForNetwork`, subscribes to the reachability
//! signal, and parks without occupying a worker. It resumes **exactly once**
//! when the signal first reads `true`; toggles before that observation are
//! coalesced, and once the task has started, later flips cannot re-trigger it
//! (the subscription is dropped before the run).
//!
//! ## Per-launch transitions
//! ```text
//! start ──► registry unregistered ──► Err(NotRegistered)        (sync)
//!   │
//!   ├─► reachable now ──► Loading ──► run once ──► Success | Error
//!   │
//!   └─► unreachable ──► WaitingForNetwork ──► park
//!         ├─► signal true  ──► unsubscribe ──► Loading ──► run once
//!         ├─► signal false ──► stay parked
//!         ├─► scope ended  ──► finally ──► Err(Canceled)
//!         └─► budget spent ──► finally ──► Err(Canceled)  (WaitTimedOut event)
//! ```
//!
//! ## Cancellation
//! Cooperative and observed at suspension points only (the parked select, the
//! poll tick, the task's own awaits). A cancellation observed by this launcher
//! — parked or mid-run — runs `finally` exactly once and resolves the launch
//! to `Err(Canceled)` without touching `on_error`. The wait budget is
//! deliberate give-up, so it is delivered the same way and is distinguishable
//! only by the `WaitTimedOut` event.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::connectivity::ReachabilitySignal;
use crate::error::{LaunchError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::launch::{LaunchHandle, Launcher, WaitOptions, publish_state};
use crate::runner::{Hooks, run_guarded};
use crate::scope::{Scope, ScopePhase};
use crate::state::{StateCell, TaskState};
use crate::tasks::{NetTask, TaskRef};

impl Launcher {
    /// Launches `task`, waiting for connectivity if necessary.
    ///
    /// - `state`: optional observed-state sink; receives the
    ///   `WaitingForNetwork → Loading → terminal` progression.
    /// - `scope`: optional owning lifetime; its end cancels the launch whether
    ///   parked or running. A launch binds to at most one scope.
    /// - `options`: wait budget; `None` falls back to the budget in the
    ///   launcher's [`Config`](crate::Config). A zero `cancel_timeout` parks
    ///   indefinitely.
    ///
    /// Fails synchronously with [`LaunchError::NotRegistered`] when the
    /// registry was never initialized; nothing is published in that case.
    pub fn launch_waiting<T: Send + Sync + 'static>(
        &self,
        task: TaskRef<T>,
        hooks: Hooks,
        state: Option<StateCell<T>>,
        scope: Option<&Scope>,
        options: Option<WaitOptions>,
    ) -> Result<LaunchHandle, LaunchError> {
        self.registry().ensure_registered()?;

        let signal = self.registry().signal().clone();
        let bus = self.bus().clone();
        let timeout = self.config().default_task_timeout();
        let options = options.unwrap_or_else(|| self.config().wait_options());
        let cancel = scope.map(Scope::bind).unwrap_or_default();
        let mut hooks = hooks;

        Ok(tokio::spawn(async move {
            waiting_cycle(
                task.as_ref(),
                &signal,
                &cancel,
                &mut hooks,
                state.as_ref(),
                options,
                timeout,
                &bus,
            )
            .await
        }))
    }

    /// Re-runs the whole waiting protocol each time `scope` re-enters its
    /// active phase.
    ///
    /// Each activation produces a fresh `Idle → … → terminal` cycle in
    /// `state`; deactivation cancels the in-flight cycle cooperatively, and
    /// ending the scope stops the repetition for good. At most one cycle runs
    /// per activation.
    pub fn launch_waiting_repeating<T: Send + Sync + 'static>(
        &self,
        task: TaskRef<T>,
        hooks: Hooks,
        state: Option<StateCell<T>>,
        scope: &Scope,
        options: Option<WaitOptions>,
    ) -> Result<JoinHandle<()>, LaunchError> {
        self.registry().ensure_registered()?;

        let signal = self.registry().signal().clone();
        let bus = self.bus().clone();
        let timeout = self.config().default_task_timeout();
        let options = options.unwrap_or_else(|| self.config().wait_options());
        let token = scope.bind();
        let mut phases = scope.phases();
        let mut hooks = hooks;

        Ok(tokio::spawn(async move {
            loop {
                if !wait_for_phase(&mut phases, &token, ScopePhase::Active).await {
                    return;
                }

                if let Some(cell) = state.as_ref() {
                    cell.reset();
                }

                let cycle_cancel = token.child_token();
                let cycle = waiting_cycle(
                    task.as_ref(),
                    &signal,
                    &cycle_cancel,
                    &mut hooks,
                    state.as_ref(),
                    options,
                    timeout,
                    &bus,
                );
                tokio::pin!(cycle);

                let mut deactivation = phases.clone();
                let mut deactivated = false;
                loop {
                    tokio::select! {
                        _ = &mut cycle => break,
                        _ = leaves_active(&mut deactivation), if !deactivated => {
                            deactivated = true;
                            cycle_cancel.cancel();
                        }
                    }
                }

                if token.is_cancelled() {
                    return;
                }
                // One cycle per activation: the phase must leave Active
                // before the protocol restarts.
                if !wait_for_phase(&mut phases, &token, ScopePhase::Inactive).await {
                    return;
                }
            }
        }))
    }
}

/// Resolves once the phase leaves `Active`; pends forever if the channel
/// closes (the scope's own token handles that teardown).
async fn leaves_active(rx: &mut watch::Receiver<ScopePhase>) {
    loop {
        if *rx.borrow_and_update() != ScopePhase::Active {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Waits until the scope phase equals `target`.
///
/// Returns `false` when the scope ended (or its channel closed) instead.
async fn wait_for_phase(
    rx: &mut watch::Receiver<ScopePhase>,
    token: &CancellationToken,
    target: ScopePhase,
) -> bool {
    loop {
        match *rx.borrow_and_update() {
            ScopePhase::Ended => return false,
            phase if phase == target => return true,
            _ => {}
        }
        tokio::select! {
            _ = token.cancelled() => return false,
            changed = rx.changed() => {
                if changed.is_err() {
                    return false;
                }
            }
        }
    }
}

/// One full wait-then-run cycle.
#[allow(clippy::too_many_arguments)]
async fn waiting_cycle<T: Send + 'static>(
    task: &dyn NetTask<T>,
    signal: &ReachabilitySignal,
    cancel: &CancellationToken,
    hooks: &mut Hooks,
    state: Option<&StateCell<T>>,
    options: WaitOptions,
    task_timeout: Option<Duration>,
    bus: &Bus,
) -> Result<(), TaskError> {
    if cancel.is_cancelled() {
        return finish_cancelled(task.name(), hooks, bus, "scope ended before launch");
    }

    if !signal.current() {
        publish_state(state, TaskState::WaitingForNetwork);
        bus.publish(Event::new(EventKind::WaitingForNetwork).with_task(task.name()));

        let mut rx = signal.observe();
        let parked_at = Instant::now();
        let budget = options.budget();

        loop {
            // Latest value wins; toggles since the last poll are coalesced.
            if *rx.borrow_and_update() {
                break;
            }
            if let Some(opts) = &budget {
                if parked_at.elapsed() >= opts.cancel_timeout {
                    bus.publish(
                        Event::new(EventKind::WaitTimedOut)
                            .with_task(task.name())
                            .with_elapsed(parked_at.elapsed()),
                    );
                    hooks.fire_finally();
                    return Err(TaskError::Canceled);
                }
            }

            match &budget {
                Some(opts) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return finish_cancelled(task.name(), hooks, bus, "scope ended");
                        }
                        changed = rx.changed() => {
                            if changed.is_err() {
                                return finish_cancelled(task.name(), hooks, bus, "signal closed");
                            }
                        }
                        _ = time::sleep(opts.poll_interval) => {}
                    }
                }
                None => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return finish_cancelled(task.name(), hooks, bus, "scope ended");
                        }
                        changed = rx.changed() => {
                            if changed.is_err() {
                                return finish_cancelled(task.name(), hooks, bus, "signal closed");
                            }
                        }
                    }
                }
            }
        }

        // One-shot from here on: further flips must not re-trigger the task.
        drop(rx);
        bus.publish(
            Event::new(EventKind::NetworkResumed)
                .with_task(task.name())
                .with_elapsed(parked_at.elapsed()),
        );
    }

    publish_state(state, TaskState::Loading);
    match run_guarded(task, cancel, task_timeout, hooks, state, bus).await {
        Err(TaskError::Canceled) => {
            // The runner skipped `finally` on purpose; the launcher owns it
            // on the cancellation path.
            finish_cancelled(task.name(), hooks, bus, "cancelled while running")
        }
        other => other,
    }
}

fn finish_cancelled(
    name: &str,
    hooks: &mut Hooks,
    bus: &Bus,
    reason: &'static str,
) -> Result<(), TaskError> {
    bus.publish(
        Event::new(EventKind::WaitCancelled)
            .with_task(name)
            .with_reason(reason),
    );
    hooks.fire_finally();
    Err(TaskError::Canceled)
}

//! # Guarded execution of one task attempt.
//!
//! Executes a single [`NetTask`] with lifecycle hooks, optional timeout,
//! state publication and event publishing — the containment wrapper every
//! launcher delegates to.
//!
//! ## Flow
//! ```text
//! Success:
//!   on_start → task.run() → Ok(success outcome)
//!     → publish Success state → on_success → finally → TaskSucceeded event
//!
//! Classified failure:
//!   on_start → task.run() → Ok(non-success outcome)
//!     → publish Error{meta} state → on_error → finally → TaskFailed event
//!
//! Failure / timeout:
//!   on_start → task.run() → Err(Fail | Timeout | ...)
//!     → publish Error{cause} state → on_error → finally → TaskFailed event
//!
//! Cancellation:
//!   task.run() → Err(Canceled) → propagates untouched
//!     (no on_error, no finally here — the launcher owns finally on that path)
//! ```
//!
//! ## Rules
//! - `on_start` runs at most once; exactly one of `on_success`/`on_error`
//!   runs unless the attempt was cancelled.
//! - `finally` runs on every completion path except propagated cancellation.
//! - Timeout is a **distinct condition** from cancellation: the child token is
//!   cancelled to stop the task, but the result is delivered to `on_error`.
//! - The task gets a **child token**; cancelling it never affects the parent.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::state::{StateCell, TaskState};
use crate::tasks::NetTask;

/// Lifecycle callbacks for one launch.
///
/// All hooks default to no-ops. They run inline on the launch's own task, so
/// keep them cheap; push heavy work to a [`Subscribe`](crate::Subscribe)
/// implementation instead.
///
/// # Example
/// ```
/// use netwait::Hooks;
///
/// let hooks = Hooks::new()
///     .on_start(|| println!("starting"))
///     .on_success(|| println!("done"))
///     .on_error(|err| eprintln!("failed: {err}"))
///     .on_finally(|| println!("cleanup"));
/// ```
#[derive(Default)]
pub struct Hooks {
    on_start: Option<Box<dyn FnMut() + Send>>,
    on_success: Option<Box<dyn FnMut() + Send>>,
    on_error: Option<Box<dyn FnMut(&TaskError) + Send>>,
    on_finally: Option<Box<dyn FnMut() + Send>>,
}

impl Hooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked once when task execution actually starts (never while parked).
    pub fn on_start(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Invoked when the outcome is classified successful.
    pub fn on_success(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Invoked for every failure except cooperative cancellation.
    pub fn on_error(mut self, f: impl FnMut(&TaskError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Invoked after success, failure, or launcher-observed cancellation.
    pub fn on_finally(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_finally = Some(Box::new(f));
        self
    }

    pub(crate) fn fire_start(&mut self) {
        if let Some(f) = self.on_start.as_mut() {
            f();
        }
    }

    pub(crate) fn fire_success(&mut self) {
        if let Some(f) = self.on_success.as_mut() {
            f();
        }
    }

    pub(crate) fn fire_error(&mut self, err: &TaskError) {
        if let Some(f) = self.on_error.as_mut() {
            f(err);
        }
    }

    pub(crate) fn fire_finally(&mut self) {
        if let Some(f) = self.on_finally.as_mut() {
            f();
        }
    }
}

/// Executes a single attempt of `task` under the hook contract.
///
/// The published state sequence contribution is exactly one terminal
/// (`Success`/`Error`) on completion, or nothing on cancellation — the caller
/// has already published `Loading`.
pub(crate) async fn run_guarded<T: Send + 'static>(
    task: &dyn NetTask<T>,
    parent: &CancellationToken,
    timeout: Option<Duration>,
    hooks: &mut Hooks,
    state: Option<&StateCell<T>>,
    bus: &Bus,
) -> Result<(), TaskError> {
    let child = parent.child_token();

    hooks.fire_start();
    bus.publish(Event::new(EventKind::TaskStarting).with_task(task.name()));

    let res = if let Some(dur) = timeout.filter(|d| *d > Duration::ZERO) {
        match time::timeout(dur, task.run(child.clone())).await {
            Ok(r) => r,
            Err(_elapsed) => {
                child.cancel();
                Err(TaskError::Timeout { timeout: dur })
            }
        }
    } else {
        task.run(child.clone()).await
    };

    match res {
        Ok(outcome) if outcome.is_success() => {
            if let Some(cell) = state {
                cell.publish(TaskState::Success(outcome));
            }
            hooks.fire_success();
            hooks.fire_finally();
            bus.publish(Event::new(EventKind::TaskSucceeded).with_task(task.name()));
            Ok(())
        }
        Ok(outcome) => {
            let err = TaskError::Response {
                meta: outcome.meta.clone(),
            };
            if let Some(cell) = state {
                cell.publish(TaskState::Error {
                    meta: Some(outcome.meta),
                    cause: None,
                });
            }
            hooks.fire_error(&err);
            hooks.fire_finally();
            bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(task.name())
                    .with_reason(err.as_message()),
            );
            Err(err)
        }
        Err(TaskError::Canceled) => {
            bus.publish(
                Event::new(EventKind::TaskStopped)
                    .with_task(task.name())
                    .with_reason("cancelled"),
            );
            Err(TaskError::Canceled)
        }
        Err(e) => {
            if let Some(cell) = state {
                cell.publish(TaskState::Error {
                    meta: None,
                    cause: Some(e.clone()),
                });
            }
            hooks.fire_error(&e);
            hooks.fire_finally();
            bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(task.name())
                    .with_reason(e.as_message()),
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Outcome, ResponseMeta};
    use crate::tasks::TaskFn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counters {
        start: AtomicUsize,
        success: AtomicUsize,
        error: AtomicUsize,
        finally: AtomicUsize,
    }

    impl Counters {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                start: AtomicUsize::new(0),
                success: AtomicUsize::new(0),
                error: AtomicUsize::new(0),
                finally: AtomicUsize::new(0),
            })
        }

        fn hooks(self: &Arc<Self>) -> Hooks {
            let (a, b, c, d) = (
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
            );
            Hooks::new()
                .on_start(move || {
                    a.start.fetch_add(1, Ordering::SeqCst);
                })
                .on_success(move || {
                    b.success.fetch_add(1, Ordering::SeqCst);
                })
                .on_error(move |_| {
                    c.error.fetch_add(1, Ordering::SeqCst);
                })
                .on_finally(move || {
                    d.finally.fetch_add(1, Ordering::SeqCst);
                })
        }

        fn snapshot(&self) -> (usize, usize, usize, usize) {
            (
                self.start.load(Ordering::SeqCst),
                self.success.load(Ordering::SeqCst),
                self.error.load(Ordering::SeqCst),
                self.finally.load(Ordering::SeqCst),
            )
        }
    }

    #[tokio::test]
    async fn success_fires_start_success_finally_once_each() {
        let counters = Counters::new();
        let mut hooks = counters.hooks();
        let task = TaskFn::new("ok", |_ctx: CancellationToken| async {
            Ok(Outcome::success(1))
        });
        let bus = Bus::new(8);
        let cell: StateCell<i32> = StateCell::new();

        let res = run_guarded(
            &task,
            &CancellationToken::new(),
            None,
            &mut hooks,
            Some(&cell),
            &bus,
        )
        .await;

        assert!(res.is_ok());
        assert_eq!(counters.snapshot(), (1, 1, 0, 1));
        assert!(matches!(cell.get(), TaskState::Success(_)));
    }

    #[tokio::test]
    async fn classified_failure_goes_to_on_error_with_meta() {
        let counters = Counters::new();
        let mut hooks = counters.hooks();
        let meta = ResponseMeta {
            code: 503,
            ..ResponseMeta::default()
        };
        let task = TaskFn::new("bad-status", move |_ctx: CancellationToken| {
            let meta = meta.clone();
            async move { Ok(Outcome::<i32>::failure(meta)) }
        });
        let bus = Bus::new(8);
        let cell: StateCell<i32> = StateCell::new();

        let res = run_guarded(
            &task,
            &CancellationToken::new(),
            None,
            &mut hooks,
            Some(&cell),
            &bus,
        )
        .await;

        assert!(matches!(res, Err(TaskError::Response { .. })));
        assert_eq!(counters.snapshot(), (1, 0, 1, 1));
        match cell.get() {
            TaskState::Error { meta, cause } => {
                assert_eq!(meta.expect("meta").code, 503);
                assert!(cause.is_none());
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_propagates_without_error_or_finally() {
        let counters = Counters::new();
        let mut hooks = counters.hooks();
        let task = TaskFn::new("cancelled", |_ctx: CancellationToken| async {
            Err(TaskError::Canceled)
        });
        let bus = Bus::new(8);
        let cell: StateCell<i32> = StateCell::new();

        let res = run_guarded(
            &task,
            &CancellationToken::new(),
            None,
            &mut hooks,
            Some(&cell),
            &bus,
        )
        .await;

        assert!(matches!(res, Err(TaskError::Canceled)));
        // on_start ran, nothing else; no terminal state published.
        assert_eq!(counters.snapshot(), (1, 0, 0, 0));
        assert!(matches!(cell.get(), TaskState::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_delivered_to_on_error() {
        let counters = Counters::new();
        let mut hooks = counters.hooks();
        let task = TaskFn::new("slow", |ctx: CancellationToken| async move {
            // Honors the token the runner cancels on timeout.
            ctx.cancelled().await;
            Err(TaskError::Canceled)
        });
        let bus = Bus::new(8);

        let res = run_guarded(
            &task,
            &CancellationToken::new(),
            Some(Duration::from_millis(20)),
            &mut hooks,
            None::<&StateCell<i32>>,
            &bus,
        )
        .await;

        assert!(matches!(res, Err(TaskError::Timeout { .. })));
        assert_eq!(counters.snapshot(), (1, 0, 1, 1));
    }
}

//! # Fail-fast launcher.
//!
//! Runs the task only when a network is reachable *right now*; otherwise the
//! launch fails immediately with [`TaskError::NoNetwork`] delivered through
//! `on_error` and the published `Error` state. Intended for calls where
//! waiting for the network to come back is not worth it.
//!
//! ## Published sequences
//! ```text
//! reachable:    Loading → Success | Error
//! unreachable:  Error(NoNetwork)        (Loading is never published)
//! ```

use tokio_util::sync::CancellationToken;

use crate::error::{LaunchError, TaskError};
use crate::events::{Event, EventKind};
use crate::launch::{LaunchHandle, Launcher, publish_state};
use crate::runner::{Hooks, run_guarded};
use crate::state::{StateCell, TaskState};
use crate::tasks::TaskRef;

impl Launcher {
    /// Launches `task` if a network is reachable, else fails fast.
    ///
    /// Fails synchronously with [`LaunchError::NotRegistered`] when the
    /// registry was never initialized; nothing is published in that case.
    ///
    /// When unreachable, [`TaskError::NoNetwork`] goes to `on_error`, the
    /// observed state receives `Error { cause: NoNetwork }`, and `finally`
    /// runs — a runtime condition, not a cancellation.
    pub fn launch_aware<T: Send + Sync + 'static>(
        &self,
        task: TaskRef<T>,
        hooks: Hooks,
        state: Option<StateCell<T>>,
    ) -> Result<LaunchHandle, LaunchError> {
        self.registry().ensure_registered()?;

        let signal = self.registry().signal().clone();
        let bus = self.bus().clone();
        let timeout = self.config().default_task_timeout();
        let mut hooks = hooks;

        Ok(tokio::spawn(async move {
            if signal.current() {
                publish_state(state.as_ref(), TaskState::Loading);
                let ctx = CancellationToken::new();
                run_guarded(task.as_ref(), &ctx, timeout, &mut hooks, state.as_ref(), &bus).await
            } else {
                let err = TaskError::NoNetwork;
                publish_state(
                    state.as_ref(),
                    TaskState::Error {
                        meta: None,
                        cause: Some(err.clone()),
                    },
                );
                hooks.fire_error(&err);
                hooks.fire_finally();
                bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_task(task.name())
                        .with_reason(err.as_message()),
                );
                Err(err)
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::connectivity::Registry;
    use crate::state::Outcome;
    use crate::tasks::TaskFn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick_task(runs: &Arc<AtomicUsize>) -> TaskRef<i32> {
        let runs = Arc::clone(runs);
        TaskFn::arc("quick", move |_ctx: CancellationToken| {
            let runs = Arc::clone(&runs);
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(Outcome::success(7))
            }
        })
    }

    #[tokio::test]
    async fn fails_synchronously_when_unregistered() {
        let registry = Registry::new();
        let launcher = Launcher::new(registry, Config::default());
        let runs = Arc::new(AtomicUsize::new(0));
        let state: StateCell<i32> = StateCell::new();

        let res = launcher.launch_aware(quick_task(&runs), Hooks::new(), Some(state.clone()));
        assert!(matches!(res, Err(LaunchError::NotRegistered)));

        // No publication, no execution.
        assert!(matches!(state.get(), TaskState::Idle));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reachable_publishes_loading_then_success() {
        let registry = Registry::new();
        registry.register().set_reachable(true);
        let launcher = Launcher::new(registry, Config::default());
        let mut events = launcher.bus().subscribe();

        let runs = Arc::new(AtomicUsize::new(0));
        let state: StateCell<i32> = StateCell::new();
        let handle = launcher
            .launch_aware(quick_task(&runs), Hooks::new(), Some(state.clone()))
            .expect("registered");

        assert!(handle.await.expect("join").is_ok());
        assert!(matches!(state.get(), TaskState::Success(_)));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // Event stream shows start then success; never a wait.
        let mut kinds = Vec::new();
        while let Ok(ev) = events.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds, vec![EventKind::TaskStarting, EventKind::TaskSucceeded]);
    }

    #[tokio::test]
    async fn unreachable_fails_fast_without_loading() {
        let registry = Registry::new();
        registry.register().set_reachable(false);
        let launcher = Launcher::new(registry, Config::default());

        let runs = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let finals = Arc::new(AtomicUsize::new(0));
        let state: StateCell<i32> = StateCell::new();

        let hooks = {
            let (errors, finals) = (Arc::clone(&errors), Arc::clone(&finals));
            Hooks::new()
                .on_error(move |err| {
                    assert!(matches!(err, TaskError::NoNetwork));
                    errors.fetch_add(1, Ordering::SeqCst);
                })
                .on_finally(move || {
                    finals.fetch_add(1, Ordering::SeqCst);
                })
        };

        let handle = launcher
            .launch_aware(quick_task(&runs), hooks, Some(state.clone()))
            .expect("registered");

        assert!(matches!(handle.await.expect("join"), Err(TaskError::NoNetwork)));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(finals.load(Ordering::SeqCst), 1);
        match state.get() {
            TaskState::Error { meta, cause } => {
                assert!(meta.is_none());
                assert!(matches!(cause, Some(TaskError::NoNetwork)));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }
}

//! Observable task state: the closed variant model and its publisher.
//!
//! ## Contents
//! - [`TaskState`] — `Idle` / `Loading` / `WaitingForNetwork` /
//!   `Success` / `Error`, exactly one active per launch.
//! - [`Outcome`], [`ResponseMeta`] — the raw result a task returns and the
//!   diagnostic snapshot it carries.
//! - [`StateCell`] — the optional write-only sink launches publish into;
//!   consumers (a UI layer, a test) subscribe and render.
//!
//! ## Ordering invariant
//! Per launch the published sequence is
//! `Idle* → {Loading | WaitingForNetwork} → [Loading] → {Success | Error}`.
//! `Success` and `Error` are terminal; [`StateCell`] rejects any publication
//! after a terminal state. `WaitingForNetwork` may return to `Loading` only as
//! part of resuming after reconnect.

mod meta;

pub use meta::{Outcome, ResponseMeta};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::error::TaskError;

/// Progress and result of one launched task.
///
/// A tagged union with derived views as free methods, no virtual dispatch.
#[derive(Debug, Clone)]
pub enum TaskState<T> {
    /// No execution has started.
    Idle,
    /// Execution in flight.
    Loading,
    /// Execution deferred pending reachability; holds no partial result.
    WaitingForNetwork,
    /// The classifier marked the outcome successful; carries the raw payload
    /// and the metadata snapshot for diagnostics.
    Success(Outcome<T>),
    /// The task failed; carries captured metadata, a caught failure, or both.
    Error {
        /// Response metadata, when the task produced a structured outcome.
        meta: Option<ResponseMeta>,
        /// The caught failure, when the task erred rather than returned.
        cause: Option<TaskError>,
    },
}

impl<T> TaskState<T> {
    /// Classifies a raw outcome: success predicate true ⇒ [`TaskState::Success`],
    /// otherwise [`TaskState::Error`] with metadata taken from the outcome.
    ///
    /// # Example
    /// ```
    /// use netwait::{Outcome, ResponseMeta, TaskState};
    ///
    /// let ok = TaskState::classify(Outcome::success(42));
    /// assert!(matches!(ok, TaskState::Success(_)));
    ///
    /// let meta = ResponseMeta { code: 404, ..ResponseMeta::default() };
    /// let err = TaskState::<i32>::classify(Outcome::failure(meta));
    /// assert!(matches!(err, TaskState::Error { meta: Some(_), cause: None }));
    /// ```
    pub fn classify(outcome: Outcome<T>) -> Self {
        if outcome.is_success() {
            TaskState::Success(outcome)
        } else {
            TaskState::Error {
                meta: Some(outcome.meta),
                cause: None,
            }
        }
    }

    /// Whether this is a terminal state (`Success` or `Error`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Success(_) | TaskState::Error { .. })
    }

    /// Formatted diagnostic for an `Error` state, combining whichever of
    /// metadata and cause is present. `None` for non-error states.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            TaskState::Error { meta, cause } => {
                let mut out = String::new();
                if let Some(m) = meta {
                    out.push_str(&format!("response:\n{m}\n"));
                }
                if let Some(c) = cause {
                    out.push_str(&format!("cause:\n{c}"));
                }
                Some(out.trim_end().to_string())
            }
            _ => None,
        }
    }

    /// Dispatches on the variant with one closure per state.
    ///
    /// The sink-side counterpart of the state machine: consumers render each
    /// variant without matching on the enum directly.
    pub fn handle<R>(
        &self,
        on_idle: impl FnOnce() -> R,
        on_loading: impl FnOnce() -> R,
        on_waiting: impl FnOnce() -> R,
        on_success: impl FnOnce(&Outcome<T>) -> R,
        on_error: impl FnOnce(Option<&ResponseMeta>, Option<&TaskError>) -> R,
    ) -> R {
        match self {
            TaskState::Idle => on_idle(),
            TaskState::Loading => on_loading(),
            TaskState::WaitingForNetwork => on_waiting(),
            TaskState::Success(outcome) => on_success(outcome),
            TaskState::Error { meta, cause } => on_error(meta.as_ref(), cause.as_ref()),
        }
    }
}

/// Observable single-value cell a launch publishes [`TaskState`] into.
///
/// Wraps [`tokio::sync::watch`]: subscribers replay the latest state and then
/// see every update. The cell enforces the ordering invariant — once a
/// terminal state is published, further publications are ignored until
/// [`reset`](StateCell::reset).
///
/// Cheap to clone; all clones refer to the same cell.
pub struct StateCell<T> {
    inner: Arc<CellInner<T>>,
}

struct CellInner<T> {
    tx: watch::Sender<TaskState<T>>,
    terminal: AtomicBool,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateCell<T> {
    /// Creates a cell in [`TaskState::Idle`].
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TaskState::Idle);
        Self {
            inner: Arc::new(CellInner {
                tx,
                terminal: AtomicBool::new(false),
            }),
        }
    }

    /// Subscribes to state updates; the receiver replays the current state.
    pub fn subscribe(&self) -> watch::Receiver<TaskState<T>> {
        self.inner.tx.subscribe()
    }

    /// Publishes the next state.
    ///
    /// Returns `false` (and publishes nothing) if a terminal state was already
    /// published. There is a single publisher per launch cycle, so the
    /// check-then-set here is not racy in practice.
    pub fn publish(&self, next: TaskState<T>) -> bool {
        if self.inner.terminal.load(Ordering::Acquire) {
            return false;
        }
        if next.is_terminal() {
            self.inner.terminal.store(true, Ordering::Release);
        }
        self.inner.tx.send_replace(next);
        true
    }

    /// Clears the terminal latch and publishes [`TaskState::Idle`].
    ///
    /// Used by the repeating launcher to start a fresh
    /// `Idle → … → terminal` cycle when the bound scope re-activates.
    pub fn reset(&self) {
        self.inner.terminal.store(false, Ordering::Release);
        self.inner.tx.send_replace(TaskState::Idle);
    }
}

impl<T: Clone> StateCell<T> {
    /// Returns a clone of the current state.
    pub fn get(&self) -> TaskState<T> {
        self.inner.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_404() -> ResponseMeta {
        ResponseMeta {
            code: 404,
            successful: false,
            message: Some("Not Found".into()),
            error_body: Some("{\"error\":\"missing\"}".into()),
            ..ResponseMeta::default()
        }
    }

    #[test]
    fn classify_success_keeps_payload() {
        let state = TaskState::classify(Outcome::success("body".to_string()));
        match state {
            TaskState::Success(outcome) => {
                assert_eq!(outcome.payload.as_deref(), Some("body"));
                assert!(outcome.meta.successful);
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn classify_failure_carries_meta_not_generic_cause() {
        let state = TaskState::<String>::classify(Outcome::failure(meta_404()));
        match state {
            TaskState::Error { meta, cause } => {
                assert_eq!(meta.expect("meta").code, 404);
                assert!(cause.is_none());
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn diagnostic_combines_meta_and_cause() {
        let state: TaskState<()> = TaskState::Error {
            meta: Some(meta_404()),
            cause: Some(TaskError::Fail {
                error: "boom".into(),
            }),
        };
        let diag = state.diagnostic().expect("error state");
        assert!(diag.contains("code: 404"));
        assert!(diag.contains("boom"));

        assert!(TaskState::<()>::Loading.diagnostic().is_none());
    }

    #[test]
    fn handle_dispatches_per_variant() {
        let label = |s: &TaskState<i32>| {
            s.handle(
                || "idle",
                || "loading",
                || "waiting",
                |_| "success",
                |_, _| "error",
            )
        };
        assert_eq!(label(&TaskState::Idle), "idle");
        assert_eq!(label(&TaskState::WaitingForNetwork), "waiting");
        assert_eq!(label(&TaskState::Success(Outcome::success(1))), "success");
    }

    #[tokio::test]
    async fn cell_rejects_publication_after_terminal() {
        let cell: StateCell<i32> = StateCell::new();
        assert!(cell.publish(TaskState::Loading));
        assert!(cell.publish(TaskState::Success(Outcome::success(5))));

        // Terminal latch holds.
        assert!(!cell.publish(TaskState::Loading));
        assert!(matches!(cell.get(), TaskState::Success(_)));
    }

    #[tokio::test]
    async fn cell_reset_starts_a_fresh_cycle() {
        let cell: StateCell<i32> = StateCell::new();
        cell.publish(TaskState::Success(Outcome::success(5)));

        cell.reset();
        assert!(matches!(cell.get(), TaskState::Idle));
        assert!(cell.publish(TaskState::Loading));
    }

    #[tokio::test]
    async fn subscriber_replays_latest_state() {
        let cell: StateCell<i32> = StateCell::new();
        cell.publish(TaskState::WaitingForNetwork);

        let rx = cell.subscribe();
        assert!(matches!(*rx.borrow(), TaskState::WaitingForNetwork));
    }
}

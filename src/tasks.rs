//! # Task abstraction and function-backed implementation.
//!
//! This module defines the [`NetTask`] trait (async, cancelable, returning a
//! classified [`Outcome`]) and a convenient function-backed implementation
//! [`TaskFn`]. The common handle type is [`TaskRef`], an `Arc<dyn NetTask>`
//! suitable for sharing across launches.
//!
//! A task receives a [`CancellationToken`] and must honor it: check or select
//! on cancellation and return [`TaskError::Canceled`] rather than swallowing
//! the signal. Cancellation here is advisory — the launcher never forcibly
//! kills uncooperative work.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::state::Outcome;

/// # Asynchronous, cancelable unit of network-gated work.
///
/// A task has a stable [`name`](NetTask::name) and an async
/// [`run`](NetTask::run) that yields either a classified [`Outcome`] (the
/// transport decided success or failure and attached metadata) or a
/// [`TaskError`] when it failed outright.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use netwait::{NetTask, Outcome, TaskError};
///
/// struct FetchProfile;
///
/// #[async_trait]
/// impl NetTask<String> for FetchProfile {
///     fn name(&self) -> &str { "fetch-profile" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<Outcome<String>, TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         Ok(Outcome::success("profile".to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait NetTask<T>: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task until completion or cancellation.
    ///
    /// Implementations should select on `ctx.cancelled()` at their own
    /// suspension points and return [`TaskError::Canceled`] promptly.
    async fn run(&self, ctx: CancellationToken) -> Result<Outcome<T>, TaskError>;
}

/// Shared handle to a task.
pub type TaskRef<T> = Arc<dyn NetTask<T>>;

/// Function-backed task implementation.
///
/// Wraps a closure that *creates* a new future per run, so repeated launches
/// (the repeating variant restarts the whole protocol per scope activation)
/// never share hidden mutable state. Use an explicit `Arc` inside the closure
/// when shared state is actually wanted.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use netwait::{Outcome, TaskError, TaskFn, TaskRef};
///
/// let t: TaskRef<u32> = TaskFn::arc("answer", |_ctx: CancellationToken| async {
///     Ok(Outcome::success(42))
/// });
/// assert_eq!(t.name(), "answer");
/// ```
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<T, F, Fut> NetTask<T> for TaskFn<F>
where
    T: Send + 'static,
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Outcome<T>, TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<Outcome<T>, TaskError> {
        (self.f)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn task_fn_runs_and_reports_name() {
        let t: TaskRef<i32> =
            TaskFn::arc("double", |_ctx: CancellationToken| async {
                Ok(Outcome::success(2))
            });
        assert_eq!(t.name(), "double");

        let out = t.run(CancellationToken::new()).await.expect("outcome");
        assert_eq!(out.payload, Some(2));
    }

    #[tokio::test]
    async fn task_fn_observes_cancellation() {
        let t: TaskRef<i32> = TaskFn::arc("cancel-aware", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(TaskError::Canceled);
            }
            Ok(Outcome::success(1))
        });

        let ctx = CancellationToken::new();
        ctx.cancel();
        assert!(matches!(t.run(ctx).await, Err(TaskError::Canceled)));
    }
}

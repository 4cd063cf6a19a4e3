//! Error types used by the netwait launchers and tasks.
//!
//! This module defines two error enums:
//!
//! - [`LaunchError`] — integration errors reported synchronously to the caller.
//! - [`TaskError`] — failures surfaced through the async error channel
//!   (`on_error` hook and the published [`TaskState::Error`](crate::TaskState)).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. Cooperative cancellation is a distinct [`TaskError`]
//! variant so the containment wrapper can pattern-match on it instead of
//! relying on an exception hierarchy: [`TaskError::Canceled`] is never
//! delivered to `on_error` and always propagates to the caller.

use std::time::Duration;
use thiserror::Error;

use crate::state::ResponseMeta;

/// # Integration errors reported synchronously at launch time.
///
/// These indicate caller misuse rather than a runtime condition, so they are
/// returned directly from the `launch_*` methods instead of flowing through
/// the async error channel.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// A gated operation was invoked before [`Registry::register`](crate::Registry::register)
    /// was called. Register the connectivity listener once at application startup.
    #[error("network listener not registered; call Registry::register() at startup")]
    NotRegistered,
}

impl LaunchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LaunchError::NotRegistered => "not_registered",
        }
    }
}

/// # Failures surfaced by a task execution or by the launch protocol.
///
/// Delivered to the `on_error` hook and published as
/// [`TaskState::Error`](crate::TaskState), with one exception:
/// [`TaskError::Canceled`] propagates to the caller untouched.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum TaskError {
    /// No reachable network at launch time (fail-fast launcher only).
    #[error("no network connection available")]
    NoNetwork,

    /// The task produced a structured outcome classified as non-success.
    #[error("request finished with non-success status {}", meta.code)]
    Response {
        /// Captured response metadata (status, message, body, headers).
        meta: ResponseMeta,
    },

    /// Task execution failed with an unstructured error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task execution exceeded its timeout budget.
    ///
    /// Unlike cancellation this is a regular failure: it is delivered to
    /// `on_error` and `finally` still runs.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Cooperative cancellation: the owning scope ended, the caller cancelled
    /// explicitly, or the wait budget was exhausted.
    ///
    /// Never delivered to `on_error`; it unwinds to the caller's own
    /// supervising scope.
    #[error("cancelled by owning scope")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use netwait::TaskError;
    ///
    /// let err = TaskError::NoNetwork;
    /// assert_eq!(err.as_label(), "no_network");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::NoNetwork => "no_network",
            TaskError::Response { .. } => "response_error",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::NoNetwork => "no network connection".to_string(),
            TaskError::Response { meta } => format!("non-success response:\n{meta}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            TaskError::Canceled => "cancelled".to_string(),
        }
    }

    /// Indicates whether this error is a cooperative-cancellation signal.
    ///
    /// Cancellation is never routed through `on_error`; callers that funnel
    /// errors should check this first.
    ///
    /// # Example
    /// ```
    /// use netwait::TaskError;
    ///
    /// assert!(TaskError::Canceled.is_cancellation());
    /// assert!(!TaskError::NoNetwork.is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

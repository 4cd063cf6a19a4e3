//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! Primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [waiting] task=fetch-profile
//! [resumed] task=fetch-profile waited=1204ms
//! [starting] task=fetch-profile
//! [failed] task=fetch-profile reason="non-success response: 503"
//! [wait-timeout] task=fetch-profile waited=30001ms
//! [wait-cancelled] task=fetch-profile reason="scope ended"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::WaitingForNetwork => {
                println!("[waiting] task={task}");
            }
            EventKind::NetworkResumed => {
                println!(
                    "[resumed] task={task} waited={}ms",
                    e.elapsed_ms.unwrap_or(0)
                );
            }
            EventKind::WaitCancelled => {
                println!(
                    "[wait-cancelled] task={task} reason={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::WaitTimedOut => {
                println!(
                    "[wait-timeout] task={task} waited={}ms",
                    e.elapsed_ms.unwrap_or(0)
                );
            }
            EventKind::TaskStarting => {
                println!("[starting] task={task}");
            }
            EventKind::TaskSucceeded => {
                println!("[succeeded] task={task}");
            }
            EventKind::TaskFailed => {
                println!(
                    "[failed] task={task} reason={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::TaskStopped => {
                println!("[stopped] task={task}");
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={task} reason={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panic] subscriber={task} info={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

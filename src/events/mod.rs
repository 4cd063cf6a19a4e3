//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the launchers and the
//! guarded runner.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Launcher::launch_aware`, `Launcher::launch_waiting`,
//!   `run_guarded`, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the forwarding listener spawned by
//!   [`Launcher::with_subscribers`](crate::Launcher::with_subscribers), which
//!   fans events out to [`Subscribe`](crate::Subscribe) implementations.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

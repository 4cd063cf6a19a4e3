//! Event subscribers: the extension point for logging, metrics and alerting.
//!
//! ## Architecture
//! ```text
//! Launcher ── publish(Event) ──► Bus ──► forwarding listener
//!                                              │
//!                                        SubscriberSet
//!                                   ┌─────────┼─────────┐
//!                                   ▼         ▼         ▼
//!                               [queue 1] [queue 2] [queue N]   (bounded)
//!                                   ▼         ▼         ▼
//!                               worker 1  worker 2  worker N
//!                                   ▼         ▼         ▼
//!                              sub1.on_event()  ...  subN.on_event()
//! ```
//!
//! Each subscriber has a dedicated bounded queue and worker, so a slow or
//! panicking subscriber never blocks the launchers or its peers.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

//! # netwait
//!
//! **netwait** is a small orchestration library for network-gated async tasks.
//!
//! It lets a caller launch a unit of work whose execution depends on live
//! network reachability. A launch either fails fast when the network is down,
//! or parks and transparently resumes when connectivity returns. Progress is
//! reported through an observable [`TaskState`], and every launch can be bound
//! to a caller-owned [`Scope`] so it is cancelled automatically when that
//! scope ends.
//!
//! ## Architecture
//! ```text
//!    OS connectivity source                      caller
//!            │                                     │
//!            ▼                                     ▼
//!   ┌───────────────────┐  observe()  ┌────────────────────────┐
//!   │ ReachabilitySignal│◄────────────│        Launcher        │
//!   │   (watch<bool>)   │             │  launch_aware()        │
//!   └────────┬──────────┘             │  launch_waiting()      │
//!            │ gate                   │  launch_waiting_repeat │
//!   ┌────────┴─────────┐              └───────────┬────────────┘
//!   │     Registry     │                          │
//!   │ (one-time init)  │              ┌───────────▼────────────┐
//!   └──────────────────┘              │      run_guarded       │
//!                                     │ on_start / on_success  │
//!   ┌──────────────────┐   cancel     │ on_error / finally     │
//!   │      Scope       │─────────────►│ (cancellation passes   │
//!   │ (caller lifetime)│              │  through untouched)    │
//!   └──────────────────┘              └───────────┬────────────┘
//!                                                 │
//!                   TaskState published ◄─────────┤
//!                   (Idle / Loading /             │
//!                    WaitingForNetwork /          ▼
//!                    Success / Error)      Bus ──► Subscribe impls
//! ```
//!
//! ## Lifecycle of a waiting launch
//! ```text
//! launch_waiting()
//!   ├─► Registry not registered ──► Err(LaunchError::NotRegistered)  (sync)
//!   ├─► reachable now ──► publish Loading ──► run task ──► Success | Error
//!   └─► unreachable   ──► publish WaitingForNetwork, subscribe to signal
//!         ├─► signal flips true ──► unsubscribe ──► Loading ──► run once
//!         ├─► scope ends / wait budget exceeded ──► finally ──► Canceled
//!         └─► signal flips false ──► stay parked
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use netwait::{Config, Hooks, Launcher, Outcome, Registry, Scope, StateCell, TaskFn};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Once, at application startup. The returned handle is fed by the
//!     // platform connectivity callback.
//!     let registry = Registry::new();
//!     let net = registry.register();
//!     net.set_reachable(true);
//!
//!     let launcher = Launcher::new(Arc::clone(&registry), Config::default());
//!
//!     let fetch = TaskFn::arc("fetch-profile", |_ctx: CancellationToken| async {
//!         Ok(Outcome::success("profile-body".to_string()))
//!     });
//!
//!     let scope = Scope::new();
//!     let state: StateCell<String> = StateCell::new();
//!     let handle = launcher.launch_waiting(
//!         fetch,
//!         Hooks::new().on_success(|| println!("done")),
//!         Some(state.clone()),
//!         Some(&scope),
//!         None,
//!     )?;
//!     let _ = handle.await?;
//!     Ok(())
//! }
//! ```

mod config;
mod connectivity;
mod error;
mod events;
mod launch;
mod runner;
mod scope;
mod state;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use connectivity::{ReachabilityHandle, ReachabilitySignal, Registry};
pub use error::{LaunchError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use launch::{LaunchHandle, Launcher, WaitOptions};
pub use runner::Hooks;
pub use scope::{Scope, ScopePhase};
pub use state::{Outcome, ResponseMeta, StateCell, TaskState};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{NetTask, TaskFn, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

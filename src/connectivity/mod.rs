//! Reachability tracking: the process-wide connectivity signal and its
//! one-time registration gate.
//!
//! ## Contents
//! - [`ReachabilitySignal`] — shared boolean cell fed by the OS connectivity
//!   source, observable by any number of launches.
//! - [`Registry`] — initialization gate; every reachability-dependent launch
//!   consults it first and fails with
//!   [`LaunchError::NotRegistered`](crate::LaunchError) if it was never set up.
//! - [`ReachabilityHandle`] — the setter handed to the platform layer by
//!   [`Registry::register`].
//!
//! The registry is an explicitly-owned, injectable value (`Arc<Registry>`),
//! never an ambient global, so tests can substitute a controlled instance.

mod registry;
mod signal;

pub use registry::{ReachabilityHandle, Registry};
pub use signal::ReachabilitySignal;

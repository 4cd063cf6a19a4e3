//! # One-time initialization gate for reachability tracking.
//!
//! [`Registry`] owns the process-wide [`ReachabilitySignal`] and a
//! registration flag. Registration happens once at application startup; the
//! returned [`ReachabilityHandle`] is the entry point the platform
//! connectivity callback feeds (`set_reachable(true)` on validated
//! connectivity, `set_reachable(false)` on loss).
//!
//! ## Rules
//! - `register()` is **idempotent**: calling it twice flips nothing and hands
//!   back a handle to the same signal. It never duplicates notifications per
//!   value flip, because all handles write through one cell.
//! - The flag only moves `unregistered → registered`; there is no unregister.
//! - Gated launches call [`Registry::ensure_registered`] first and fail
//!   synchronously with [`LaunchError::NotRegistered`] while unregistered.
//!   That is an integration bug (missing startup wiring), not a transient
//!   runtime condition.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::connectivity::signal::ReachabilitySignal;
use crate::error::LaunchError;

/// Registration gate plus the reachability cell it guards.
///
/// Created once and shared (`Arc<Registry>`); launchers hold a reference and
/// consult it on every launch.
#[derive(Debug)]
pub struct Registry {
    registered: AtomicBool,
    signal: ReachabilitySignal,
}

/// Setter handed to the OS connectivity layer by [`Registry::register`].
///
/// The sole mutation entry point for the reachability value.
#[derive(Clone, Debug)]
pub struct ReachabilityHandle {
    signal: ReachabilitySignal,
}

impl ReachabilityHandle {
    /// Records the latest connectivity determination and wakes all observers.
    ///
    /// Call with `true` when validated internet-capable connectivity appears
    /// and `false` when it disappears. Notifies on every invocation, even for
    /// repeats of the same value (the platform callback fires per network
    /// event, not per flip).
    pub fn set_reachable(&self, value: bool) {
        self.signal.set(value);
    }
}

impl Registry {
    /// Creates an unregistered registry with an unreachable signal.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registered: AtomicBool::new(false),
            signal: ReachabilitySignal::new(),
        })
    }

    /// Marks the registry as registered and returns the signal's setter.
    ///
    /// Idempotent: repeated calls leave the flag set and return a handle to
    /// the same underlying cell.
    ///
    /// # Example
    /// ```
    /// use netwait::Registry;
    ///
    /// let registry = Registry::new();
    /// assert!(!registry.is_registered());
    ///
    /// let net = registry.register();
    /// assert!(registry.is_registered());
    /// net.set_reachable(true);
    /// assert!(registry.signal().current());
    /// ```
    pub fn register(&self) -> ReachabilityHandle {
        self.registered.store(true, Ordering::Release);
        ReachabilityHandle {
            signal: self.signal.clone(),
        }
    }

    /// Returns whether [`register`](Self::register) has been called.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Read access to the reachability cell.
    pub fn signal(&self) -> &ReachabilitySignal {
        &self.signal
    }

    /// Fails with [`LaunchError::NotRegistered`] while unregistered.
    pub(crate) fn ensure_registered(&self) -> Result<(), LaunchError> {
        if self.is_registered() {
            Ok(())
        } else {
            Err(LaunchError::NotRegistered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_unregistered() {
        let registry = Registry::new();
        assert!(!registry.is_registered());
        assert_eq!(
            registry.ensure_registered(),
            Err(LaunchError::NotRegistered)
        );
    }

    #[tokio::test]
    async fn register_is_idempotent() {
        let registry = Registry::new();
        let first = registry.register();
        let second = registry.register();
        assert!(registry.is_registered());

        // Both handles write through the same cell.
        first.set_reachable(true);
        assert!(registry.signal().current());
        second.set_reachable(false);
        assert!(!registry.signal().current());
    }

    #[tokio::test]
    async fn double_register_does_not_duplicate_notifications() {
        let registry = Registry::new();
        let handle = registry.register();
        let _again = registry.register();

        let mut rx = registry.signal().observe();
        handle.set_reachable(true);

        rx.changed().await.expect("signal alive");
        assert!(*rx.borrow_and_update());
        // One flip, one notification.
        assert!(!rx.has_changed().expect("signal alive"));
    }
}

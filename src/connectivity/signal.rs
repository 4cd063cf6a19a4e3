//! # Process-wide network reachability cell.
//!
//! [`ReachabilitySignal`] is a thin wrapper over [`tokio::sync::watch`]:
//! one mutator (the registered OS connectivity callback), many observers.
//! Each observer sees the current value immediately on subscribe and every
//! subsequent update.
//!
//! ## Rules
//! - **Replay**: a fresh [`observe`](ReachabilitySignal::observe) receiver
//!   starts with the latest value already available via `borrow()`.
//! - **Notify on every set**: [`set`](ReachabilitySignal::set) wakes observers
//!   on *every* invocation, including repeats of the same value. The platform
//!   callback fires per network event, not per flip, and that behavior is
//!   preserved here. Observers that only care about flips must compare values.
//! - **No locks across awaits**: reads are instantaneous borrows; waiting
//!   happens inside the watch channel.

use tokio::sync::watch;

/// Shared boolean cell holding the latest "is a network reachable" value.
///
/// Cheap to clone (internally a watch sender handle). All clones refer to the
/// same cell. No launch owns or mutates it; the only mutator is the
/// [`ReachabilityHandle`](crate::ReachabilityHandle) returned by
/// [`Registry::register`](crate::Registry::register).
#[derive(Clone, Debug)]
pub struct ReachabilitySignal {
    tx: watch::Sender<bool>,
}

impl ReachabilitySignal {
    /// Creates a new signal, initially unreachable.
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns the current reachability value.
    pub fn current(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribes to reachability updates.
    ///
    /// The receiver replays the current value (`borrow()`) and then observes
    /// every subsequent [`set`](Self::set). Each call creates an independent
    /// receiver; intermediate values between two polls are coalesced to the
    /// latest, which is exactly the guarantee launches need (only the
    /// transition to `true` matters, not how many times it toggled before).
    pub fn observe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Replaces the current value and wakes all observers.
    ///
    /// Called by the registered OS connectivity source only. Notifies on every
    /// invocation, even when `value` equals the current value.
    pub(crate) fn set(&self, value: bool) {
        self.tx.send_replace(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_unreachable() {
        let signal = ReachabilitySignal::new();
        assert!(!signal.current());
    }

    #[tokio::test]
    async fn observer_replays_current_value() {
        let signal = ReachabilitySignal::new();
        signal.set(true);

        let rx = signal.observe();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn observer_sees_every_update() {
        let signal = ReachabilitySignal::new();
        let mut rx = signal.observe();

        signal.set(true);
        rx.changed().await.expect("signal alive");
        assert!(*rx.borrow_and_update());

        signal.set(false);
        rx.changed().await.expect("signal alive");
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn repeated_identical_set_still_notifies() {
        let signal = ReachabilitySignal::new();
        let mut rx = signal.observe();

        signal.set(false);
        assert!(rx.has_changed().expect("signal alive"));
        rx.borrow_and_update();

        signal.set(false);
        assert!(rx.has_changed().expect("signal alive"));
    }

    #[tokio::test]
    async fn many_observers_share_one_cell() {
        let signal = ReachabilitySignal::new();
        let a = signal.observe();
        let b = signal.clone().observe();

        signal.set(true);
        assert!(*a.borrow());
        assert!(*b.borrow());
    }
}

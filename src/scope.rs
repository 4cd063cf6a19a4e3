//! # Caller-owned lifetime that launches bind to.
//!
//! A [`Scope`] models the lifetime of a caller context (a screen, a request,
//! a session). Launches bound to it are cancelled cooperatively when the
//! scope ends, and the repeating launcher restarts its protocol each time the
//! scope re-enters the [`ScopePhase::Active`] phase.
//!
//! ## Rules
//! - [`Scope::end`] fires the one-shot "ended" notification: the token
//!   cancels, the phase moves to `Ended`, and neither ever reverts.
//! - Dropping a scope ends it — a launch can never outlive the context that
//!   owns it.
//! - A launch binds to at most one scope; binding hands out a **child** token,
//!   so a bound launch cannot cancel the scope in reverse.
//! - Phase changes after `Ended` are ignored.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Activity phase of a scope.
///
/// `Active`/`Inactive` model foreground/background transitions of the owning
/// context; only the repeating launcher reacts to them. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePhase {
    /// The owning context is in its active phase (e.g. foregrounded).
    Active,
    /// The owning context is alive but inactive (e.g. backgrounded).
    Inactive,
    /// The owning context is gone; all bound launches are cancelled.
    Ended,
}

/// Caller-owned lifetime handle.
///
/// Created alongside the context it models and shared by reference with the
/// launcher at bind time; the launcher keeps only derived tokens and phase
/// receivers, never the scope itself.
///
/// # Example
/// ```
/// use netwait::Scope;
///
/// let scope = Scope::new();
/// let token = scope.bind();
/// assert!(!token.is_cancelled());
///
/// scope.end();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug)]
pub struct Scope {
    token: CancellationToken,
    phase: watch::Sender<ScopePhase>,
}

impl Scope {
    /// Creates a scope in the [`ScopePhase::Active`] phase.
    pub fn new() -> Self {
        let (phase, _rx) = watch::channel(ScopePhase::Active);
        Self {
            token: CancellationToken::new(),
            phase,
        }
    }

    /// Returns a child cancellation token tied to this scope's lifetime.
    ///
    /// The token cancels when the scope ends. Cancelling the returned token
    /// directly affects only that launch, never the scope.
    pub fn bind(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Subscribes to phase transitions (replays the current phase).
    pub fn phases(&self) -> watch::Receiver<ScopePhase> {
        self.phase.subscribe()
    }

    /// Current phase.
    pub fn phase(&self) -> ScopePhase {
        *self.phase.borrow()
    }

    /// Moves the scope to [`ScopePhase::Active`]. Ignored after `end`.
    pub fn activate(&self) {
        self.set_phase(ScopePhase::Active);
    }

    /// Moves the scope to [`ScopePhase::Inactive`]. Ignored after `end`.
    pub fn deactivate(&self) {
        self.set_phase(ScopePhase::Inactive);
    }

    /// Ends the scope: cancels every bound launch and seals the phase.
    ///
    /// Idempotent; the "ended" notification fires exactly once per bound
    /// token (CancellationToken semantics).
    pub fn end(&self) {
        self.phase.send_replace(ScopePhase::Ended);
        self.token.cancel();
    }

    /// Whether [`end`](Self::end) has been called (or the scope dropped).
    pub fn is_ended(&self) -> bool {
        self.token.is_cancelled()
    }

    fn set_phase(&self, next: ScopePhase) {
        self.phase.send_if_modified(|current| {
            if *current == ScopePhase::Ended || *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn end_cancels_bound_tokens() {
        let scope = Scope::new();
        let a = scope.bind();
        let b = scope.bind();

        scope.end();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert!(scope.is_ended());
    }

    #[tokio::test]
    async fn bound_token_cannot_cancel_the_scope() {
        let scope = Scope::new();
        let bound = scope.bind();

        bound.cancel();
        assert!(!scope.is_ended());
        assert!(!scope.bind().is_cancelled());
    }

    #[tokio::test]
    async fn drop_ends_the_scope() {
        let scope = Scope::new();
        let bound = scope.bind();

        drop(scope);
        assert!(bound.is_cancelled());
    }

    #[tokio::test]
    async fn phase_transitions_are_sealed_after_end() {
        let scope = Scope::new();
        let phases = scope.phases();
        assert_eq!(scope.phase(), ScopePhase::Active);

        scope.deactivate();
        assert_eq!(scope.phase(), ScopePhase::Inactive);

        scope.end();
        scope.activate();
        assert_eq!(scope.phase(), ScopePhase::Ended);
        assert_eq!(*phases.borrow(), ScopePhase::Ended);
    }
}

//! # Demo: repeat_on_active
//!
//! Re-runs the waiting protocol each time a scope re-enters its active phase,
//! the way a screen refreshes whenever it comes back to the foreground.
//!
//! Demonstrates how to:
//! - Drive [`Scope::activate`] / [`Scope::deactivate`] from a lifecycle.
//! - Use [`Launcher::launch_waiting_repeating`] for one run per activation.
//! - Attach the built-in [`LogWriter`] subscriber to the event stream.
//!
//! ## Flow
//! ```text
//! launch_waiting_repeating(scope)
//!     ├─► activation #1 ──► Idle → Loading → Success
//!     │     ... deactivate / activate ...
//!     ├─► activation #2 ──► Idle → Loading → Success
//!     └─► scope.end() ──► repetition stops
//! ```
//!
//! ## Run
//! Requires the `logging` feature for [`LogWriter`].
//! ```bash
//! cargo run --example repeat_on_active --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use netwait::{
    Config, Hooks, Launcher, LogWriter, Outcome, Registry, Scope, StateCell, Subscribe, TaskFn,
    TaskRef,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();
    registry.register().set_reachable(true);

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let launcher = Launcher::with_subscribers(registry, Config::default(), subs);

    let refreshes = Arc::new(AtomicUsize::new(0));
    let refresh: TaskRef<usize> = {
        let refreshes = Arc::clone(&refreshes);
        TaskFn::arc("refresh-feed", move |_ctx: CancellationToken| {
            let refreshes = Arc::clone(&refreshes);
            async move {
                let n = refreshes.fetch_add(1, Ordering::SeqCst) + 1;
                println!("[refresh-feed] refresh #{n}");
                tokio::time::sleep(Duration::from_millis(150)).await;
                Ok(Outcome::success(n))
            }
        })
    };

    let scope = Scope::new();
    let state: StateCell<usize> = StateCell::new();
    let handle = launcher.launch_waiting_repeating(
        refresh,
        Hooks::new(),
        Some(state.clone()),
        &scope,
        None,
    )?;

    // First activation runs immediately (the scope starts active).
    tokio::time::sleep(Duration::from_millis(400)).await;

    println!("[main] backgrounded");
    scope.deactivate();
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!("[main] foregrounded");
    scope.activate();
    tokio::time::sleep(Duration::from_millis(400)).await;

    scope.end();
    handle.await?;
    println!("[main] total refreshes: {}", refreshes.load(Ordering::SeqCst));
    Ok(())
}

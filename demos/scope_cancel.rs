//! # Demo: scope_cancel
//!
//! Binds a waiting launch to a [`Scope`] and ends the scope while the launch
//! is still parked. The task never starts, `on_error` never fires, and
//! `finally` runs exactly once.
//!
//! Demonstrates how to:
//! - Bind a launch to an owning lifetime with [`Scope`].
//! - Distinguish cancellation (`Err(TaskError::Canceled)`) from failure.
//! - Use a [`WaitOptions`] budget so an unbound wait cannot park forever.
//!
//! ## Flow
//! ```text
//! launch_waiting(scope)
//!     ├─► publish(WaitingForNetwork)      network is down
//!     │     ... scope.end() ...
//!     ├─► publish(WaitCancelled)
//!     ├─► finally
//!     └─► handle resolves Err(Canceled)   on_error never invoked
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example scope_cancel
//! ```

use std::time::Duration;

use netwait::{
    Config, Hooks, Launcher, Outcome, Registry, Scope, StateCell, TaskFn, TaskRef, WaitOptions,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();
    registry.register().set_reachable(false);
    let launcher = Launcher::new(registry, Config::default());

    let sync: TaskRef<()> = TaskFn::arc("sync-notes", |_ctx: CancellationToken| async {
        println!("[sync-notes] running (you should never see this)");
        Ok(Outcome::success(()))
    });

    let hooks = Hooks::new()
        .on_error(|err| println!("[hooks] error: {err} (you should never see this)"))
        .on_finally(|| println!("[hooks] finally"));

    // The budget is a second safety net; the scope ends first in this demo.
    let options = WaitOptions::new(Duration::from_millis(100), Duration::from_secs(10));

    let scope = Scope::new();
    let state: StateCell<()> = StateCell::new();
    let handle = launcher.launch_waiting(sync, hooks, Some(state), Some(&scope), Some(options))?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("[main] leaving the screen, ending the scope");
    scope.end();

    match handle.await? {
        Err(err) if err.is_cancellation() => println!("[main] launch cancelled, as expected"),
        other => println!("[main] unexpected result: {other:?}"),
    }
    Ok(())
}

//! # Demo: waiting_basics
//!
//! A single network-bound task launched while the network is down. The launch
//! parks instead of failing, then resumes exactly once when connectivity
//! returns.
//!
//! Demonstrates how to:
//! - Wire a [`Registry`] and feed it from a platform connectivity callback
//!   (simulated here with a timer).
//! - Observe the `WaitingForNetwork → Loading → Success` progression through
//!   a [`StateCell`].
//! - Attach [`Hooks`] for side effects around the run.
//!
//! ## Flow
//! ```text
//! launch_waiting()
//!     ├─► publish(WaitingForNetwork)      network is down
//!     │     ... 800ms later the handle flips to reachable ...
//!     ├─► publish(NetworkResumed)
//!     ├─► publish(Loading)
//!     ├─► run task once
//!     └─► publish(Success)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example waiting_basics
//! ```

use std::time::Duration;

use netwait::{Config, Hooks, Launcher, Outcome, Registry, StateCell, TaskFn, TaskRef, TaskState};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Register the reachability source once at startup.
    let registry = Registry::new();
    let net = registry.register();
    net.set_reachable(false);

    // 2. One launcher for the whole app; defaults are fine here.
    let launcher = Launcher::new(registry, Config::default());

    // 3. A task that pretends to call a remote service.
    let fetch: TaskRef<String> = TaskFn::arc("fetch-profile", |_ctx: CancellationToken| async {
        println!("[fetch-profile] calling the service...");
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(Outcome::success("profile for user 42".to_string()))
    });

    // 4. Observe the state machine from the outside.
    let state: StateCell<String> = StateCell::new();
    let mut states = state.subscribe();
    tokio::spawn(async move {
        loop {
            let label = states.borrow_and_update().handle(
                || "idle",
                || "loading",
                || "waiting for network",
                |_| "success",
                |_, _| "error",
            );
            println!("[state] {label}");
            if states.changed().await.is_err() {
                break;
            }
        }
    });

    let hooks = Hooks::new()
        .on_success(|| println!("[hooks] success"))
        .on_finally(|| println!("[hooks] finally"));

    // 5. Launch while the network is down: this parks, it does not fail.
    let handle = launcher.launch_waiting(fetch, hooks, Some(state.clone()), None, None)?;

    // 6. Simulate the platform reporting connectivity back.
    tokio::time::sleep(Duration::from_millis(800)).await;
    println!("[net] connectivity restored");
    net.set_reachable(true);

    handle.await??;
    if let TaskState::Success(outcome) = state.get() {
        println!("[main] got: {:?}", outcome.payload);
    }
    Ok(())
}

//! # Non-blocking event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`] — distributes events to multiple subscribers
//! concurrently without blocking the publisher.
//!
//! ## Rules
//! - **No cross-subscriber ordering**: subscriber A may process event N while
//!   B processes N+5.
//! - **Per-subscriber FIFO**: each subscriber sees events in order.
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow`
//!   published.
//! - **Isolation**: a slow or panicking subscriber does not affect others.
//! - **No feedback**: the listener never forwards plumbing reports
//!   (`SubscriberOverflow`/`SubscriberPanicked`) back into the set; they stay
//!   on the bus for external receivers. A subscriber that panics on every
//!   event would otherwise re-trigger itself through its own panic report.
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind` to isolate panics: the panic is converted
//! to a `SubscriberPanicked` event and the worker continues with the next
//! event. `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if a subscriber panics while holding a lock.

use std::any::Any;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event subscribers.
///
/// Manages per-subscriber bounded queues and worker tasks. Usually wired up
/// through [`Launcher::with_subscribers`](crate::Launcher::with_subscribers);
/// construct directly only when driving a custom bus.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Workers start immediately and process events until their queue closes.
    /// Minimum queue capacity is 1 (enforced).
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, rx) = mpsc::channel::<Arc<Event>>(cap);

            workers.push(tokio::spawn(drive_subscriber(sub, rx, bus.clone())));
            channels.push(SubscriberChannel { name, sender: tx });
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Spawns a listener forwarding bus events into this set.
    ///
    /// Consumes the set; the listener runs until `stop` is cancelled (or the
    /// bus closes), then releases the queues so workers drain and exit. The
    /// set holds its own bus handle for overflow reports, so the stop token
    /// is the reliable way to end the listener.
    ///
    /// Plumbing reports the set itself produces are not forwarded; only
    /// launch lifecycle events reach the subscribers.
    pub fn spawn_listener(
        self,
        mut rx: broadcast::Receiver<Event>,
        stop: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    recv = rx.recv() => match recv {
                        Ok(ev) if is_plumbing(&ev) => continue,
                        Ok(ev) => self.emit_arc(Arc::new(ev)),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            self.shutdown().await;
        })
    }

    /// Emits a pre-allocated `Arc<Event>` to all subscribers.
    ///
    /// Uses `try_send` (non-blocking). On queue full or closed the event is
    /// dropped for that subscriber and a `SubscriberOverflow` event is
    /// published — unless the event itself is an overflow report, which
    /// prevents feedback loops.
    pub fn emit_arc(&self, event: Arc<Event>) {
        for channel in &self.channels {
            let dropped = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !event.is_subscriber_overflow() {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, dropped));
            }
        }
    }

    /// Gracefully shuts down all subscriber workers.
    ///
    /// Drops the queue senders so workers see end-of-stream, then awaits them.
    pub async fn shutdown(self) {
        drop(self.channels);
        let _ = join_all(self.workers).await;
    }
}

fn is_plumbing(ev: &Event) -> bool {
    matches!(
        ev.kind,
        EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
    )
}

/// Worker loop for one subscriber: drain the queue, isolate panics.
async fn drive_subscriber(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = std::panic::AssertUnwindSafe(sub.on_event(ev.as_ref()))
            .catch_unwind()
            .await;
        if let Err(payload) = handled {
            bus.publish(Event::subscriber_panicked(sub.name(), panic_message(payload)));
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(msg) => *msg,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn events_reach_every_subscriber() {
        let bus = Bus::new(16);
        let seen = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(
            vec![Arc::new(Counter {
                seen: Arc::clone(&seen),
            })],
            bus.clone(),
        );
        let stop = CancellationToken::new();
        let listener = set.spawn_listener(bus.subscribe(), stop.clone());

        bus.publish(Event::new(EventKind::TaskStarting));
        bus.publish(Event::new(EventKind::TaskSucceeded));

        while seen.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        stop.cancel();
        listener.await.expect("listener");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber exploded");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated_and_reported() {
        let bus = Bus::new(16);
        let mut reports = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panicker)], bus.clone());
        let stop = CancellationToken::new();
        let listener = set.spawn_listener(bus.subscribe(), stop.clone());

        bus.publish(Event::new(EventKind::TaskStarting));

        // First the original event loops back to us, then the panic report.
        loop {
            let ev = reports.recv().await.expect("event");
            if ev.kind == EventKind::SubscriberPanicked {
                assert_eq!(ev.task.as_deref(), Some("panicker"));
                assert!(ev.reason.as_deref().unwrap_or("").contains("exploded"));
                break;
            }
        }

        stop.cancel();
        listener.await.expect("listener");
    }

    #[tokio::test]
    async fn panic_report_does_not_retrigger_the_panicking_subscriber() {
        let bus = Bus::new(16);
        let mut reports = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panicker)], bus.clone());
        let stop = CancellationToken::new();
        let listener = set.spawn_listener(bus.subscribe(), stop.clone());

        bus.publish(Event::new(EventKind::TaskStarting));

        // Exactly one report per delivered event; the report itself never
        // reaches the subscriber, so no self-sustaining storm.
        loop {
            let ev = reports.recv().await.expect("event");
            if ev.kind == EventKind::SubscriberPanicked {
                break;
            }
        }
        for _ in 0..64 {
            tokio::task::yield_now().await;
        }
        assert!(matches!(
            reports.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));

        stop.cancel();
        listener.await.expect("listener");
    }
}

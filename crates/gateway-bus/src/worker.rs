//! # Subscription Lifecycle
//!
//! The generic start/stop contract implemented by every long-lived event
//! consumer. [`spawn_worker`] first lets the worker replay anything it may
//! have missed while not subscribed, then opens the subscription and
//! processes events strictly in delivery order until shutdown. A failing
//! handler is logged and the loop continues; an unrecoverable consumer must
//! stop itself explicitly rather than let an error kill silent background
//! processing.

use crate::events::{DomainEvent, EventFilter};
use crate::publisher::InMemoryEventBus;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Error raised by a worker's replay or event handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct WorkerError(String);

impl WorkerError {
    /// Create a worker error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A long-lived consumer of domain events.
#[async_trait]
pub trait EventWorker: Send + Sync + 'static {
    /// Worker name, used in log events.
    fn name(&self) -> &'static str;

    /// Topics this worker subscribes to.
    fn filter(&self) -> EventFilter;

    /// Handle events that may have been missed while not subscribed.
    ///
    /// The policy is consumer-specific; the default is to replay nothing.
    async fn process_missed_events(&self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// Handle one event. Errors are logged by the loop and do not stop
    /// delivery of subsequent events.
    async fn handle_event(&self, event: DomainEvent) -> Result<(), WorkerError>;
}

/// Handle to a running worker loop.
///
/// [`WorkerHandle::stop`] is idempotent; dropping the handle without
/// stopping also ends the loop at its next iteration.
pub struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Signal shutdown and wait for the loop to exit. Safe to call when
    /// already stopped.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        let _ = self.shutdown.send(true);
        let _ = task.await;
    }

    /// True while the worker loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

/// Start a worker: replay missed events, subscribe, then process events in
/// order until shutdown. Cancellation is cooperative and takes effect at
/// the next loop iteration, never mid-event.
pub fn spawn_worker<W: EventWorker>(worker: Arc<W>, bus: Arc<InMemoryEventBus>) -> WorkerHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        if let Err(e) = worker.process_missed_events().await {
            error!(worker = worker.name(), error = %e, "Missed-event replay failed");
        }

        let mut subscription = bus.subscribe(worker.filter());
        debug!(worker = worker.name(), "Worker subscribed");

        loop {
            tokio::select! {
                // Resolves when stop() signals or the handle is dropped
                _ = shutdown_rx.changed() => break,
                event = subscription.recv() => {
                    let Some(event) = event else {
                        // Bus closed
                        break;
                    };
                    if let Err(e) = worker.handle_event(event).await {
                        error!(worker = worker.name(), error = %e, "Event handler failed");
                    }
                }
            }
        }

        debug!(worker = worker.name(), "Worker stopped");
    });

    WorkerHandle {
        shutdown,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTopic;
    use crate::publisher::EventPublisher;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    struct CountingWorker {
        handled: AtomicUsize,
        replayed: AtomicUsize,
        fail_first: bool,
    }

    impl CountingWorker {
        fn new(fail_first: bool) -> Self {
            Self {
                handled: AtomicUsize::new(0),
                replayed: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl EventWorker for CountingWorker {
        fn name(&self) -> &'static str {
            "counting-worker"
        }

        fn filter(&self) -> EventFilter {
            EventFilter::topics(vec![EventTopic::Blocks])
        }

        async fn process_missed_events(&self) -> Result<(), WorkerError> {
            self.replayed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn handle_event(&self, _event: DomainEvent) -> Result<(), WorkerError> {
            let seen = self.handled.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && seen == 0 {
                return Err(WorkerError::new("first event rejected"));
            }
            Ok(())
        }
    }

    fn block_event() -> DomainEvent {
        DomainEvent::NewBlockDiscovered {
            created_at: Utc::now(),
        }
    }

    async fn wait_for(counter: &AtomicUsize, expected: usize) {
        timeout(Duration::from_secs(1), async {
            while counter.load(Ordering::SeqCst) < expected {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("worker did not observe expected events in time");
    }

    #[tokio::test]
    async fn test_worker_replays_then_processes() {
        let bus = Arc::new(InMemoryEventBus::new());
        let worker = Arc::new(CountingWorker::new(false));

        let mut handle = spawn_worker(worker.clone(), bus.clone());

        // Give the loop time to subscribe before publishing
        wait_for(&worker.replayed, 1).await;
        sleep(Duration::from_millis(10)).await;

        bus.publish(block_event()).await;
        bus.publish(block_event()).await;

        wait_for(&worker.handled, 2).await;
        handle.stop().await;

        assert_eq!(worker.replayed.load(Ordering::SeqCst), 1);
        assert_eq!(worker.handled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_handler_error_does_not_stop_loop() {
        let bus = Arc::new(InMemoryEventBus::new());
        let worker = Arc::new(CountingWorker::new(true));

        let mut handle = spawn_worker(worker.clone(), bus.clone());
        wait_for(&worker.replayed, 1).await;
        sleep(Duration::from_millis(10)).await;

        // First handler invocation errors; both events must still be seen
        bus.publish(block_event()).await;
        bus.publish(block_event()).await;

        wait_for(&worker.handled, 2).await;
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let bus = Arc::new(InMemoryEventBus::new());
        let worker = Arc::new(CountingWorker::new(false));

        let mut handle = spawn_worker(worker.clone(), bus.clone());
        wait_for(&worker.replayed, 1).await;

        handle.stop().await;
        assert!(!handle.is_running());

        // Second stop is a no-op
        handle.stop().await;

        // Events published after stop are not delivered
        bus.publish(block_event()).await;
        sleep(Duration::from_millis(20)).await;
        assert_eq!(worker.handled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_worker_ignores_filtered_topics() {
        let bus = Arc::new(InMemoryEventBus::new());
        let worker = Arc::new(CountingWorker::new(false));

        let mut handle = spawn_worker(worker.clone(), bus.clone());
        wait_for(&worker.replayed, 1).await;
        sleep(Duration::from_millis(10)).await;

        bus.publish(DomainEvent::NodeAdded {
            created_at: Utc::now(),
            node: gateway_types::Node::new("replica0", 8332, "u", "p", None),
        })
        .await;
        bus.publish(block_event()).await;

        wait_for(&worker.handled, 1).await;
        handle.stop().await;

        // Only the block event matched the filter
        assert_eq!(worker.handled.load(Ordering::SeqCst), 1);
    }
}

//! Background event dispatch.
//!
//! Committed notifications are handed to a bounded queue and published by a
//! single worker task, so a slow or failing broker never holds up the caller
//! (or the record lock it is holding).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use notifyd_core::events::{EventPublisher, PublishError, NOTIFICATION_TOPIC};
use notifyd_core::notification::Notification;

/// Retry and queueing parameters for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPolicy {
    /// Topic every notification is published to.
    pub topic: String,
    /// Attempts per event, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Base delay between attempts; attempt `n` waits `n * backoff`.
    pub backoff: Duration,
    /// Upper bound on a single publish call.
    pub timeout: Duration,
    /// Events that can wait in the queue before new ones are dropped.
    pub queue_capacity: usize,
}

impl Default for PublishPolicy {
    fn default() -> Self {
        Self {
            topic: NOTIFICATION_TOPIC.to_string(),
            max_attempts: 3,
            backoff: Duration::from_millis(200),
            timeout: Duration::from_secs(5),
            queue_capacity: 1024,
        }
    }
}

enum Command {
    Publish(Notification),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Fire-and-forget publisher front end.
pub struct EventDispatcher {
    tx: mpsc::Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventDispatcher {
    /// Starts the worker task on the current tokio runtime.
    pub fn spawn(publisher: Arc<dyn EventPublisher>, policy: PublishPolicy) -> Self {
        let (tx, rx) = mpsc::channel(policy.queue_capacity.max(1));
        let worker = tokio::spawn(run(rx, publisher, policy));

        Self {
            tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queues `notification` for publishing without waiting.
    ///
    /// Returns `false` if the event was dropped because the queue is full or
    /// the worker has stopped.
    pub fn enqueue(&self, notification: &Notification) -> bool {
        match self.tx.try_send(Command::Publish(notification.clone())) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    "Event queue full, dropping notification event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    "Event dispatcher stopped, dropping notification event"
                );
                false
            }
        }
    }

    /// Waits until every event queued before this call has been attempted.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Drains the queue and stops the worker. Later enqueues are dropped.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Shutdown(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }

        if let Some(worker) = self.worker.lock().await.take() {
            if let Err(err) = worker.await {
                tracing::error!(error = %err, "Event dispatcher worker panicked");
            }
        }
    }
}

async fn run(
    mut rx: mpsc::Receiver<Command>,
    publisher: Arc<dyn EventPublisher>,
    policy: PublishPolicy,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Publish(notification) => {
                publish_with_retry(publisher.as_ref(), &policy, &notification).await;
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
            Command::Shutdown(ack) => {
                // Closing first bounds the drain: later enqueues fail and warn.
                rx.close();
                let mut drained = 0usize;
                while let Ok(command) = rx.try_recv() {
                    match command {
                        Command::Publish(notification) => {
                            publish_with_retry(publisher.as_ref(), &policy, &notification).await;
                            drained += 1;
                        }
                        Command::Flush(waiter) | Command::Shutdown(waiter) => {
                            let _ = waiter.send(());
                        }
                    }
                }
                tracing::debug!(drained, "Drained event queue on shutdown");
                let _ = ack.send(());
                break;
            }
        }
    }

    tracing::debug!("Event dispatcher stopped");
}

/// Publishes one event, retrying with linear backoff. Returns whether it
/// was eventually accepted by the broker.
async fn publish_with_retry(
    publisher: &dyn EventPublisher,
    policy: &PublishPolicy,
    notification: &Notification,
) -> bool {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let outcome = tokio::time::timeout(
            policy.timeout,
            publisher.publish(&policy.topic, notification),
        )
        .await
        .unwrap_or(Err(PublishError::Timeout(policy.timeout)));

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    notification_id = %notification.id,
                    topic = %policy.topic,
                    attempt,
                    "Published notification event"
                );
                return true;
            }
            Err(err) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    topic = %policy.topic,
                    attempt,
                    max_attempts,
                    error = %err,
                    "Failed to publish notification event"
                );
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(policy.backoff * attempt).await;
        }
    }

    tracing::error!(
        notification_id = %notification.id,
        topic = %policy.topic,
        "Giving up on notification event"
    );
    false
}

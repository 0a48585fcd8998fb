//! Consumer pool: lifecycle pipelines with the readiness race.
//!
//! Consumer creation cannot wait for a positive ready signal — the
//! broker client emits errors early but confirms nothing. Creation
//! therefore races a bounded timeout against the handle's first error
//! event: if the window elapses quietly the handle is assumed usable,
//! if an error arrives first the creation fails with it. Dropping the
//! losing branch cancels it (the timer is dropped, the error
//! subscription is torn down).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};

use crate::broker::{
    BrokerConnector, BrokerError, BrokerMessage, ConsumerConfig, ConsumerHandle,
    TopicSubscription,
};
use crate::domain::{
    ClientId, EventBus, HandleEntry, HandleKind, HandleStatus, PoolEvent, SlotRegistry,
    StatusReport,
};
use crate::error::PoolError;

type ConsumerEntry = HandleEntry<Box<dyn ConsumerHandle>>;

/// Pool of consumer handles backed by one slot registry.
#[derive(Debug)]
pub struct ConsumerPool {
    connector: Arc<dyn BrokerConnector>,
    registry: RwLock<SlotRegistry<ConsumerEntry>>,
    event_bus: EventBus,
    ready_timeout: Duration,
}

impl ConsumerPool {
    /// Creates an empty consumer pool.
    ///
    /// `ready_timeout` is the quiet window after which a new consumer
    /// is optimistically treated as connected.
    #[must_use]
    pub fn new(
        connector: Arc<dyn BrokerConnector>,
        event_bus: EventBus,
        ready_timeout: Duration,
    ) -> Self {
        Self {
            connector,
            registry: RwLock::new(SlotRegistry::new()),
            event_bus,
            ready_timeout,
        }
    }

    /// Creates a new consumer subscribed to `topics`, runs the
    /// readiness race, and inserts the handle into the first empty slot
    /// (or appends).
    ///
    /// Whichever of timeout and first error occurs first wins; the
    /// loser is cancelled. On any failure the registry is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Broker`] if construction fails (for
    /// example, a subscription names an unknown topic) or if the handle
    /// emits an error before the readiness window elapses.
    pub async fn create(
        &self,
        config: &ConsumerConfig,
        topics: &[TopicSubscription],
    ) -> Result<StatusReport, PoolError> {
        let handle = self.connector.connect_consumer(config, topics).await?;
        self.await_readiness(handle.as_ref()).await?;

        let client_id = ClientId::new();
        let entry = HandleEntry::new(client_id, handle);

        let mut registry = self.registry.write().await;
        let before = registry.statuses();
        let index = registry.fill_or_append(entry);
        let after = registry.statuses();
        drop(registry);

        let _ = self.event_bus.publish(PoolEvent::HandleCreated {
            kind: HandleKind::Consumer,
            index,
            client_id,
            before: before.clone(),
            after: after.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(index, %client_id, "consumer created");
        Ok(StatusReport { before, after })
    }

    /// Races the readiness window against the handle's first error.
    async fn await_readiness(&self, handle: &dyn ConsumerHandle) -> Result<(), PoolError> {
        let errors = handle.subscribe_errors();
        match tokio::time::timeout(self.ready_timeout, first_error(errors)).await {
            // The window elapsed without an error: assumed connected.
            Err(_elapsed) => Ok(()),
            Ok(Some(error)) => Err(PoolError::Broker(error)),
            // Error source closed without emitting; nothing to wait for.
            Ok(None) => Ok(()),
        }
    }

    /// Closes the consumer at `index` and clears its slot.
    ///
    /// The close must complete before the slot is cleared; a close
    /// failure leaves the handle in place so the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::SlotEmpty`] if `index` is out of range or
    /// the slot is already empty, or [`PoolError::Broker`] if the
    /// handle's close fails.
    pub async fn remove(&self, index: usize) -> Result<StatusReport, PoolError> {
        let mut registry = self.registry.write().await;
        let before = registry.statuses();
        let entry = registry
            .get(index)
            .ok_or(PoolError::SlotEmpty { index })?;
        let client_id = entry.client_id;

        entry.handle.close().await?;

        let _removed = registry.clear(index);
        let after = registry.statuses();
        drop(registry);

        let _ = self.event_bus.publish(PoolEvent::HandleRemoved {
            kind: HandleKind::Consumer,
            index,
            client_id,
            before: before.clone(),
            after: after.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(index, %client_id, "consumer removed");
        Ok(StatusReport { before, after })
    }

    /// Subscribes to message events from the consumer at `index`.
    ///
    /// The subscription is taken from the handle occupying the slot at
    /// subscription time. If the slot is empty, the returned receiver
    /// is already closed and never yields an event; no retry is
    /// attempted.
    pub async fn subscribe_messages(&self, index: usize) -> broadcast::Receiver<BrokerMessage> {
        let registry = self.registry.read().await;
        match registry.get(index) {
            Some(entry) => entry.handle.subscribe_messages(),
            None => closed_receiver(),
        }
    }

    /// Subscribes to error events from the consumer at `index`.
    ///
    /// Same empty-slot contract as [`ConsumerPool::subscribe_messages`].
    pub async fn subscribe_errors(&self, index: usize) -> broadcast::Receiver<BrokerError> {
        let registry = self.registry.read().await;
        match registry.get(index) {
            Some(entry) => entry.handle.subscribe_errors(),
            None => closed_receiver(),
        }
    }

    /// Fully replaces the registry with an empty one, closing every
    /// surviving handle best-effort. Returns the number of handles
    /// drained.
    pub async fn reset(&self) -> usize {
        let mut registry = self.registry.write().await;
        let entries = registry.drain();
        drop(registry);

        let closed = entries.len();
        for entry in entries {
            if let Err(error) = entry.handle.close().await {
                tracing::warn!(client_id = %entry.client_id, %error, "close failed during reset");
            }
        }

        let _ = self.event_bus.publish(PoolEvent::RegistryReset {
            kind: HandleKind::Consumer,
            closed,
            timestamp: Utc::now(),
        });

        tracing::info!(closed, "consumer registry reset");
        closed
    }

    /// Position-wise status projection of the registry.
    pub async fn statuses(&self) -> Vec<Option<HandleStatus>> {
        self.registry.read().await.statuses()
    }
}

/// Resolves with the first error the subscription yields, skipping
/// lagged gaps, or `None` if the channel closes first.
async fn first_error(mut errors: broadcast::Receiver<BrokerError>) -> Option<BrokerError> {
    loop {
        match errors.recv().await {
            Ok(error) => return Some(error),
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// A receiver whose sender is already gone; it never yields an event.
fn closed_receiver<T: Clone>() -> broadcast::Receiver<T> {
    let (sender, receiver) = broadcast::channel(1);
    drop(sender);
    receiver
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::broker::mock::MockBroker;
    use tokio_test::assert_ok;

    fn make_pool(broker: MockBroker) -> ConsumerPool {
        ConsumerPool::new(
            Arc::new(broker),
            EventBus::new(100),
            Duration::from_millis(500),
        )
    }

    fn orders_topic() -> Vec<TopicSubscription> {
        vec![TopicSubscription::new("orders")]
    }

    fn ready() -> Option<HandleStatus> {
        Some(HandleStatus { ready: true })
    }

    #[tokio::test(start_paused = true)]
    async fn create_succeeds_after_quiet_window() {
        let pool = make_pool(MockBroker::with_topics(&["orders"]));

        let report = pool.create(&ConsumerConfig::default(), &orders_topic()).await;
        let Ok(report) = report else {
            panic!("create failed");
        };
        assert!(report.before.is_empty());
        assert_eq!(report.after, vec![ready()]);
    }

    #[tokio::test]
    async fn create_with_unknown_topic_fails_naming_it() {
        let pool = make_pool(MockBroker::with_topics(&["orders"]));
        let topics = vec![TopicSubscription::new("payments")];

        let result = pool.create(&ConsumerConfig::default(), &topics).await;
        let Err(error) = result else {
            panic!("expected topic failure");
        };
        assert!(error.to_string().contains("payments"));
        assert!(pool.statuses().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn create_fails_when_error_beats_timeout() {
        let broker = MockBroker::with_topics(&["orders"])
            .with_consumer_error(BrokerError::Transport("connection refused".to_string()));
        let pool = make_pool(broker);

        let result = pool.create(&ConsumerConfig::default(), &orders_topic()).await;
        assert!(matches!(
            result,
            Err(PoolError::Broker(BrokerError::Transport(_)))
        ));
        assert!(pool.statuses().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remove_clears_slot_without_shifting() {
        let pool = make_pool(MockBroker::with_topics(&["orders"]));
        assert_ok!(pool.create(&ConsumerConfig::default(), &orders_topic()).await);
        assert_ok!(pool.create(&ConsumerConfig::default(), &orders_topic()).await);

        let Ok(report) = pool.remove(0).await else {
            panic!("remove failed");
        };
        assert_eq!(report.before, vec![ready(), ready()]);
        assert_eq!(report.after, vec![None, ready()]);
    }

    #[tokio::test]
    async fn remove_empty_slot_fails() {
        let pool = make_pool(MockBroker::with_topics(&["orders"]));
        let result = pool.remove(0).await;
        assert!(matches!(result, Err(PoolError::SlotEmpty { index: 0 })));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_messages_delivers_pushed_events() {
        let broker = MockBroker::with_topics(&["orders"]);
        let feed = broker.message_feed();
        let pool = make_pool(broker);
        assert_ok!(pool.create(&ConsumerConfig::default(), &orders_topic()).await);

        let mut rx = pool.subscribe_messages(0).await;
        let message = BrokerMessage {
            topic: "orders".to_string(),
            partition: 0,
            offset: 42,
            key: None,
            value: "hello".to_string(),
        };
        let _ = feed.send(message.clone());

        let received = rx.recv().await;
        let Ok(received) = received else {
            panic!("expected message");
        };
        assert_eq!(received, message);
    }

    #[tokio::test]
    async fn subscribe_on_empty_slot_never_produces() {
        let pool = make_pool(MockBroker::with_topics(&["orders"]));

        let mut rx = pool.subscribe_messages(3).await;
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_drains_registry() {
        let pool = make_pool(MockBroker::with_topics(&["orders"]));
        assert_ok!(pool.create(&ConsumerConfig::default(), &orders_topic()).await);

        let closed = pool.reset().await;
        assert_eq!(closed, 1);
        assert!(pool.statuses().await.is_empty());
    }
}

//! Producer pool: lifecycle pipelines for producer handles.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::broker::{
    BrokerConnector, DeliveryReport, MessageBatch, ProducerConfig, ProducerHandle,
};
use crate::domain::{
    ClientId, EventBus, HandleEntry, HandleKind, HandleStatus, PoolEvent, SlotRegistry,
    StatusReport,
};
use crate::error::PoolError;

type ProducerEntry = HandleEntry<Box<dyn ProducerHandle>>;

/// Pool of producer handles backed by one slot registry.
///
/// Every mutation follows the pattern: construct and await readiness
/// outside the lock, then acquire the registry write lock, snapshot,
/// mutate, snapshot again, publish, return. Mutations on the same pool
/// therefore serialize; `send` only takes the read lock.
#[derive(Debug)]
pub struct ProducerPool {
    connector: Arc<dyn BrokerConnector>,
    registry: RwLock<SlotRegistry<ProducerEntry>>,
    event_bus: EventBus,
}

impl ProducerPool {
    /// Creates an empty producer pool.
    #[must_use]
    pub fn new(connector: Arc<dyn BrokerConnector>, event_bus: EventBus) -> Self {
        Self {
            connector,
            registry: RwLock::new(SlotRegistry::new()),
            event_bus,
        }
    }

    /// Creates a new producer, waits for its ready signal, and inserts
    /// it into the first empty slot (or appends).
    ///
    /// Producers wait indefinitely for readiness: the only terminal
    /// outcomes are the ready signal or a connection error. On failure
    /// the registry is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Broker`] if construction or the readiness
    /// wait fails.
    pub async fn create(&self, config: &ProducerConfig) -> Result<StatusReport, PoolError> {
        let handle = self.connector.connect_producer(config).await?;
        handle.ready().await?;

        let client_id = ClientId::new();
        let entry = HandleEntry::new(client_id, handle);

        let mut registry = self.registry.write().await;
        let before = registry.statuses();
        let index = registry.fill_or_append(entry);
        let after = registry.statuses();
        drop(registry);

        let _ = self.event_bus.publish(PoolEvent::HandleCreated {
            kind: HandleKind::Producer,
            index,
            client_id,
            before: before.clone(),
            after: after.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(index, %client_id, "producer created");
        Ok(StatusReport { before, after })
    }

    /// Closes the producer at `index` and clears its slot.
    ///
    /// The close must complete before the slot is cleared; a close
    /// failure leaves the handle in place so the caller can retry.
    /// Other handles' indices are unaffected.
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
            kind: HandleKind::Producer,
            index,
            client_id,
            before: before.clone(),
            after: after.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(index, %client_id, "producer removed");
        Ok(StatusReport { before, after })
    }

    /// Forwards message batches to the producer at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ProducerNotFound`] if the slot is empty,
    /// or [`PoolError::Broker`] with the collaborator's send failure.
    pub async fn send(
        &self,
        batches: &[MessageBatch],
        index: usize,
    ) -> Result<DeliveryReport, PoolError> {
        let registry = self.registry.read().await;
        let entry = registry
            .get(index)
            .ok_or(PoolError::ProducerNotFound { index })?;
        Ok(entry.handle.send(batches).await?)
    }

    /// Asks the producer at `index` to create the named topics.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ProducerNotFound`] if the slot is empty, or
    /// whatever failure the broker reports.
    pub async fn create_topics(&self, topics: &[String], index: usize) -> Result<(), PoolError> {
        let registry = self.registry.read().await;
        let entry = registry
            .get(index)
            .ok_or(PoolError::ProducerNotFound { index })?;
        Ok(entry.handle.create_topics(topics).await?)
    }

    /// Fully replaces the registry with an empty one, closing every
    /// surviving handle best-effort. Close failures are logged and do
    /// not fail the reset. Returns the number of handles drained.
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
            kind: HandleKind::Producer,
            closed,
            timestamp: Utc::now(),
        });

        tracing::info!(closed, "producer registry reset");
        closed
    }

    /// Position-wise status projection of the registry.
    pub async fn statuses(&self) -> Vec<Option<HandleStatus>> {
        self.registry.read().await.statuses()
    }
}

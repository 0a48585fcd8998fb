//! Pool façade owning both registries and the event bus.
//!
//! [`BrokerPool`] replaces the ambient process-wide state of a classic
//! client pool with an explicitly owned object: construct it once, pass
//! it by reference, and `reset` it from test or administrative code.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::broker::{
    BrokerConnector, BrokerError, BrokerMessage, ConsumerConfig, DeliveryReport, MessageBatch,
    ProducerConfig, TopicSubscription,
};
use crate::config::PoolConfig;
use crate::domain::{EventBus, HandleStatus, StatusReport};
use crate::error::PoolError;
use crate::service::{ConsumerPool, ProducerPool};

/// Pools of broker producer and consumer handles.
///
/// Owns two independent slot registries (one per kind) and the event
/// bus observers subscribe to. All operations are asynchronous and
/// return either a success value or a [`PoolError`].
#[derive(Debug)]
pub struct BrokerPool {
    producers: ProducerPool,
    consumers: ConsumerPool,
    event_bus: EventBus,
}

impl BrokerPool {
    /// Creates an empty pool over the given broker connector.
    #[must_use]
    pub fn new(connector: Arc<dyn BrokerConnector>, config: &PoolConfig) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let producers = ProducerPool::new(Arc::clone(&connector), event_bus.clone());
        let consumers = ConsumerPool::new(
            connector,
            event_bus.clone(),
            config.consumer_ready_timeout,
        );
        Self {
            producers,
            consumers,
            event_bus,
        }
    }

    /// Returns a reference to the event bus.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Creates a producer and inserts it into the producer registry.
    ///
    /// # Errors
    ///
    /// See [`ProducerPool::create`].
    pub async fn create_producer(
        &self,
        config: &ProducerConfig,
    ) -> Result<StatusReport, PoolError> {
        self.producers.create(config).await
    }

    /// Closes and removes the producer at `index`.
    ///
    /// # Errors
    ///
    /// See [`ProducerPool::remove`].
    pub async fn remove_producer(&self, index: usize) -> Result<StatusReport, PoolError> {
        self.producers.remove(index).await
    }

    /// Forwards message batches to the producer at `index`
    /// (conventionally 0 when only one producer is pooled).
    ///
    /// # Errors
    ///
    /// See [`ProducerPool::send`].
    pub async fn send(
        &self,
        batches: &[MessageBatch],
        index: usize,
    ) -> Result<DeliveryReport, PoolError> {
        self.producers.send(batches, index).await
    }

    /// Asks the producer at `index` to create the named topics.
    ///
    /// # Errors
    ///
    /// See [`ProducerPool::create_topics`].
    pub async fn create_topics(&self, topics: &[String], index: usize) -> Result<(), PoolError> {
        self.producers.create_topics(topics, index).await
    }

    /// Creates a consumer subscribed to `topics` and inserts it into
    /// the consumer registry.
    ///
    /// # Errors
    ///
    /// See [`ConsumerPool::create`].
    pub async fn create_consumer(
        &self,
        config: &ConsumerConfig,
        topics: &[TopicSubscription],
    ) -> Result<StatusReport, PoolError> {
        self.consumers.create(config, topics).await
    }

    /// Closes and removes the consumer at `index`.
    ///
    /// # Errors
    ///
    /// See [`ConsumerPool::remove`].
    pub async fn remove_consumer(&self, index: usize) -> Result<StatusReport, PoolError> {
        self.consumers.remove(index).await
    }

    /// Subscribes to message events from the consumer at `index`.
    /// An empty slot yields an already-closed receiver.
    pub async fn subscribe_messages(&self, index: usize) -> broadcast::Receiver<BrokerMessage> {
        self.consumers.subscribe_messages(index).await
    }

    /// Subscribes to error events from the consumer at `index`.
    /// An empty slot yields an already-closed receiver.
    pub async fn subscribe_errors(&self, index: usize) -> broadcast::Receiver<BrokerError> {
        self.consumers.subscribe_errors(index).await
    }

    /// Position-wise status projection of the producer registry.
    pub async fn producer_statuses(&self) -> Vec<Option<HandleStatus>> {
        self.producers.statuses().await
    }

    /// Position-wise status projection of the consumer registry.
    pub async fn consumer_statuses(&self) -> Vec<Option<HandleStatus>> {
        self.consumers.statuses().await
    }

    /// Fully replaces both registries with empty ones, closing every
    /// surviving handle best-effort. Returns the number of handles
    /// drained from each registry as `(producers, consumers)`.
    pub async fn reset(&self) -> (usize, usize) {
        let producers = self.producers.reset().await;
        let consumers = self.consumers.reset().await;
        (producers, consumers)
    }
}

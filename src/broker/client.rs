//! Handle and connector traits abstracting the broker client library.
//!
//! A handle is an opaque capability over one live broker connection.
//! Once a handle is inserted into a registry slot, the slot owns it
//! exclusively; removal closes the handle and drops it.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::config::{ConsumerConfig, ProducerConfig, TopicSubscription};
use super::message::{BrokerMessage, DeliveryReport, MessageBatch};

/// Error reported by the broker collaborator.
///
/// `Clone` so errors can traverse the per-handle broadcast channels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// A requested topic does not exist on the broker.
    #[error("unknown topic: {0}")]
    TopicNotFound(String),

    /// Transport-level failure (connection refused, broker down, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The broker rejected or failed a send request.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Closing the handle failed; the handle must be treated as still open.
    #[error("close failed: {0}")]
    CloseFailed(String),
}

/// Readiness flag shared by producer and consumer handles.
///
/// The flag is sampled when building status projections, so it always
/// reflects the handle's live state at snapshot time.
pub trait HandleState {
    /// Returns `true` once the handle has established its connection.
    fn is_ready(&self) -> bool;
}

impl<T: HandleState + ?Sized> HandleState for Box<T> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Capabilities of one connected producer.
#[async_trait]
pub trait ProducerHandle: HandleState + fmt::Debug + Send + Sync {
    /// Resolves once the producer's connection is ready.
    ///
    /// There is no timeout at this level: the only terminal outcomes
    /// are readiness or a connection error.
    ///
    /// # Errors
    ///
    /// Returns a [`BrokerError`] if the connection fails before
    /// becoming ready.
    async fn ready(&self) -> Result<(), BrokerError>;

    /// Forwards message batches to the broker.
    ///
    /// # Errors
    ///
    /// Returns a [`BrokerError`] if the broker rejects or fails the send.
    async fn send(&self, batches: &[MessageBatch]) -> Result<DeliveryReport, BrokerError>;

    /// Asks the broker to create the named topics, blocking until the
    /// broker acknowledges.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the broker reports; the pool does not
    /// interpret topic metadata.
    async fn create_topics(&self, topics: &[String]) -> Result<(), BrokerError>;

    /// Closes the connection. Must complete before the handle's slot
    /// is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::CloseFailed`] if teardown fails; the
    /// handle then remains in its slot.
    async fn close(&self) -> Result<(), BrokerError>;
}

/// Capabilities of one connected consumer.
#[async_trait]
pub trait ConsumerHandle: HandleState + fmt::Debug + Send + Sync {
    /// Subscribes to the consumer's message events.
    ///
    /// Each call returns an independent receiver that sees all events
    /// emitted after subscription time.
    fn subscribe_messages(&self) -> broadcast::Receiver<BrokerMessage>;

    /// Subscribes to the consumer's error events.
    fn subscribe_errors(&self) -> broadcast::Receiver<BrokerError>;

    /// Closes the connection. Must complete before the handle's slot
    /// is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::CloseFailed`] if teardown fails; the
    /// handle then remains in its slot.
    async fn close(&self) -> Result<(), BrokerError>;
}

/// Factory for broker handles.
///
/// Implemented by the broker client integration; the pool only ever
/// constructs handles through this trait.
#[async_trait]
pub trait BrokerConnector: fmt::Debug + Send + Sync {
    /// Constructs a new producer handle from the given configuration.
    ///
    /// Construction itself always succeeds from the pool's point of
    /// view; connection failures surface later through
    /// [`ProducerHandle::ready`].
    ///
    /// # Errors
    ///
    /// Returns a [`BrokerError`] only for failures the client library
    /// reports synchronously.
    async fn connect_producer(
        &self,
        config: &ProducerConfig,
    ) -> Result<Box<dyn ProducerHandle>, BrokerError>;

    /// Constructs a new consumer handle subscribed to `topics`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::TopicNotFound`] if a subscription names a
    /// topic the broker does not know, or any other synchronous client
    /// failure.
    async fn connect_consumer(
        &self,
        config: &ConsumerConfig,
        topics: &[TopicSubscription],
    ) -> Result<Box<dyn ConsumerHandle>, BrokerError>;
}

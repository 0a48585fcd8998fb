//! Broker collaborator boundary: handle traits, configuration, and
//! wire-level message types.
//!
//! The pool never speaks the broker protocol itself. Everything it
//! needs from a broker client library is captured by three traits:
//! [`BrokerConnector`] constructs handles, [`ProducerHandle`] and
//! [`ConsumerHandle`] expose the per-handle capabilities (readiness,
//! send, event subscription, close).

pub mod client;
pub mod config;
pub mod message;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{
    BrokerConnector, BrokerError, ConsumerHandle, HandleState, ProducerHandle,
};
pub use config::{
    ConnectionConfig, ConsumerConfig, ConsumerOptions, ProducerConfig, ProducerOptions,
    TopicSubscription,
};
pub use message::{BrokerMessage, DeliveryReport, MessageBatch};

//! Connection and handle configuration passed to creation operations.
//!
//! Every creation request carries two sub-configs: the transport-level
//! [`ConnectionConfig`] and the kind-specific options. All fields are
//! optional with client-library defaults; the pool forwards them opaquely.

use serde::{Deserialize, Serialize};

/// Transport-level connection options shared by producers and consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Broker host list, e.g. `["broker-1:9092", "broker-2:9092"]`.
    pub hosts: Vec<String>,

    /// Client identifier reported to the broker.
    pub client_id: Option<String>,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
}

/// Producer-specific options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerOptions {
    /// Number of broker acknowledgements required per send.
    pub require_acks: Option<u16>,

    /// How long to wait for acknowledgements, in milliseconds.
    pub ack_timeout_ms: Option<u64>,
}

/// Consumer-specific options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerOptions {
    /// Consumer group identifier.
    pub group_id: Option<String>,

    /// Whether offsets are committed automatically.
    pub auto_commit: Option<bool>,

    /// Maximum bytes fetched per request.
    pub fetch_max_bytes: Option<u32>,
}

/// Full configuration for creating one producer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Transport options.
    pub connection: ConnectionConfig,
    /// Producer-specific options.
    pub options: ProducerOptions,
}

/// Full configuration for creating one consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Transport options.
    pub connection: ConnectionConfig,
    /// Consumer-specific options.
    pub options: ConsumerOptions,
}

/// One topic subscription in a consumer creation request.
///
/// Subscriptions are ordered; the broker client consumes them in the
/// order given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSubscription {
    /// Topic name to subscribe to.
    pub topic: String,
}

impl TopicSubscription {
    /// Creates a subscription for the named topic.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

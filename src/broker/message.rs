//! Message types crossing the broker boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A batch of messages addressed to one topic, as accepted by `send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBatch {
    /// Destination topic.
    pub topic: String,

    /// Message payloads.
    pub messages: Vec<String>,

    /// Explicit partition, or `None` to let the broker client pick one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,
}

impl MessageBatch {
    /// Creates a batch for `topic` with broker-side partition selection.
    #[must_use]
    pub fn new(topic: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            messages,
            partition: None,
        }
    }
}

/// Broker acknowledgement for a send: last offset per topic partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// `topic -> partition -> offset` of the last accepted message.
    pub offsets: HashMap<String, HashMap<i32, i64>>,
}

/// One message delivered to a consumer.
///
/// `Clone` so messages can fan out through broadcast subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerMessage {
    /// Source topic.
    pub topic: String,
    /// Source partition.
    pub partition: i32,
    /// Offset within the partition.
    pub offset: i64,
    /// Optional message key.
    pub key: Option<String>,
    /// Message payload.
    pub value: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn batch_defaults_to_broker_partitioning() {
        let batch = MessageBatch::new("orders", vec!["a".to_string()]);
        assert_eq!(batch.partition, None);
        assert_eq!(batch.topic, "orders");
    }

    #[test]
    fn batch_serialization_omits_missing_partition() {
        let batch = MessageBatch::new("orders", vec![]);
        let json = serde_json::to_string(&batch).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert!(!json.contains("partition"));
    }
}

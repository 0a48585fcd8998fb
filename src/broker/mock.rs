//! In-memory broker used by the unit tests.
//!
//! Connection behavior is fixed at construction time: known topics,
//! an optional error injected shortly after consumer connect, and
//! whether `close` fails. All consumers share the broker's message and
//! error feeds so tests can push events from outside the pool.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::client::{BrokerConnector, BrokerError, ConsumerHandle, HandleState, ProducerHandle};
use super::config::{ConsumerConfig, ProducerConfig, TopicSubscription};
use super::message::{BrokerMessage, DeliveryReport, MessageBatch};

const FEED_CAPACITY: usize = 16;

/// Fake [`BrokerConnector`] with scripted connection behavior.
#[derive(Debug)]
pub(crate) struct MockBroker {
    topics: HashSet<String>,
    consumer_error: Option<BrokerError>,
    fail_close: bool,
    message_feed: broadcast::Sender<BrokerMessage>,
    error_feed: broadcast::Sender<BrokerError>,
}

impl MockBroker {
    /// Broker with no known topics.
    pub(crate) fn new() -> Self {
        Self::with_topics(&[])
    }

    /// Broker that recognizes the given topics.
    pub(crate) fn with_topics(topics: &[&str]) -> Self {
        let (message_feed, _) = broadcast::channel(FEED_CAPACITY);
        let (error_feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            topics: topics.iter().map(ToString::to_string).collect(),
            consumer_error: None,
            fail_close: false,
            message_feed,
            error_feed,
        }
    }

    /// Emits `error` on the consumer error feed shortly after each
    /// consumer connects, so it beats the pool's readiness timeout.
    pub(crate) fn with_consumer_error(mut self, error: BrokerError) -> Self {
        self.consumer_error = Some(error);
        self
    }

    /// Makes every `close` call fail.
    pub(crate) fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Sender half of the shared consumer message feed.
    pub(crate) fn message_feed(&self) -> broadcast::Sender<BrokerMessage> {
        self.message_feed.clone()
    }
}

#[async_trait]
impl BrokerConnector for MockBroker {
    async fn connect_producer(
        &self,
        _config: &ProducerConfig,
    ) -> Result<Box<dyn ProducerHandle>, BrokerError> {
        Ok(Box::new(MockProducer {
            ready: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            fail_close: self.fail_close,
        }))
    }

    async fn connect_consumer(
        &self,
        _config: &ConsumerConfig,
        topics: &[TopicSubscription],
    ) -> Result<Box<dyn ConsumerHandle>, BrokerError> {
        for subscription in topics {
            if !self.topics.contains(&subscription.topic) {
                return Err(BrokerError::TopicNotFound(subscription.topic.clone()));
            }
        }

        if let Some(error) = self.consumer_error.clone() {
            let errors = self.error_feed.clone();
            tokio::spawn(async move {
                // Small delay so the pool has subscribed before the
                // error arrives.
                tokio::time::sleep(Duration::from_millis(5)).await;
                let _ = errors.send(error);
            });
        }

        Ok(Box::new(MockConsumer {
            ready: AtomicBool::new(true),
            fail_close: self.fail_close,
            messages: self.message_feed.clone(),
            errors: self.error_feed.clone(),
        }))
    }
}

#[derive(Debug)]
struct MockProducer {
    ready: AtomicBool,
    closed: AtomicBool,
    fail_close: bool,
}

impl HandleState for MockProducer {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProducerHandle for MockProducer {
    async fn ready(&self) -> Result<(), BrokerError> {
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, batches: &[MessageBatch]) -> Result<DeliveryReport, BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::SendFailed("producer is closed".to_string()));
        }
        let mut offsets: HashMap<String, HashMap<i32, i64>> = HashMap::new();
        for batch in batches {
            let partition = batch.partition.unwrap_or(0);
            let last_offset = i64::try_from(batch.messages.len()).unwrap_or(i64::MAX);
            offsets
                .entry(batch.topic.clone())
                .or_default()
                .insert(partition, last_offset);
        }
        Ok(DeliveryReport { offsets })
    }

    async fn create_topics(&self, _topics: &[String]) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BrokerError> {
        if self.fail_close {
            return Err(BrokerError::CloseFailed("broker refused close".to_string()));
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug)]
struct MockConsumer {
    ready: AtomicBool,
    fail_close: bool,
    messages: broadcast::Sender<BrokerMessage>,
    errors: broadcast::Sender<BrokerError>,
}

impl HandleState for MockConsumer {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConsumerHandle for MockConsumer {
    fn subscribe_messages(&self) -> broadcast::Receiver<BrokerMessage> {
        self.messages.subscribe()
    }

    fn subscribe_errors(&self) -> broadcast::Receiver<BrokerError> {
        self.errors.subscribe()
    }

    async fn close(&self) -> Result<(), BrokerError> {
        if self.fail_close {
            return Err(BrokerError::CloseFailed("broker refused close".to_string()));
        }
        self.ready.store(false, Ordering::SeqCst);
        Ok(())
    }
}

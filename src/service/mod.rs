//! Service layer: the per-kind lifecycle pipelines.
//!
//! [`ProducerPool`] and [`ConsumerPool`] each own one slot registry and
//! run the create / remove pipelines against it. The two differ only in
//! their readiness policy: producers wait indefinitely for the ready
//! signal, consumers race a bounded timeout against the first error
//! event.

pub mod consumer_pool;
pub mod producer_pool;

pub use consumer_pool::ConsumerPool;
pub use producer_pool::ProducerPool;

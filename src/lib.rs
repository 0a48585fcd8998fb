//! # broker-pool
//!
//! Slot-based pools of message-broker client handles (producers and
//! consumers) with index-stable reuse of freed slots.
//!
//! The broker wire protocol is an external collaborator behind the
//! traits in [`broker`] — this crate is the lifecycle layer: create a
//! handle, race it against an early-failure signal within a bounded
//! timeout, insert it into the lowest free registry slot, and later
//! tear it down without disturbing other handles' indices. Every
//! mutating operation returns a before/after status projection of its
//! registry and publishes the same projection as an event.
//!
//! ## Architecture
//!
//! ```text
//! Callers
//!     │
//!     ├── BrokerPool (pool.rs)
//!     │
//!     ├── ProducerPool / ConsumerPool (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── SlotRegistry (domain/)
//!     └── BrokerConnector + handles (broker/)
//! ```

pub mod broker;
pub mod config;
pub mod domain;
pub mod error;
pub mod pool;
pub mod service;

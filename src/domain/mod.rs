//! Domain layer: handle identity, slot registry, status projections,
//! and the event system.
//!
//! The registry here is the heart of the crate: an ordered sequence of
//! optional slots whose indices stay stable across removals, with
//! lowest-empty-slot reuse on insertion.

pub mod client_id;
pub mod event_bus;
pub mod handle_entry;
pub mod pool_event;
pub mod slot_registry;

pub use client_id::ClientId;
pub use event_bus::EventBus;
pub use handle_entry::{HandleEntry, HandleStatus, StatusReport};
pub use pool_event::{HandleKind, PoolEvent};
pub use slot_registry::SlotRegistry;

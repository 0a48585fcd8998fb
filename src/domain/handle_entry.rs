//! Registry slot payload and status projections.
//!
//! A [`HandleEntry`] wraps the opaque broker handle with pool-side
//! metadata. [`HandleStatus`] is the minimal observable view of a slot
//! used for before/after reporting, so reports never leak the handle
//! itself.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::broker::HandleState;

use super::ClientId;

/// Aggregate wrapping a broker handle with pool metadata.
///
/// Each occupied slot in a registry holds one `HandleEntry`. The
/// `handle` field is the live connection; the remaining fields are
/// immutable after creation.
#[derive(Debug)]
pub struct HandleEntry<H> {
    /// Pool-assigned identifier for logs and events.
    pub client_id: ClientId,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// The live broker handle.
    pub handle: H,
}

impl<H> HandleEntry<H> {
    /// Creates a new entry around `handle`.
    #[must_use]
    pub fn new(client_id: ClientId, handle: H) -> Self {
        Self {
            client_id,
            created_at: Utc::now(),
            handle,
        }
    }
}

impl<H: HandleState> HandleState for HandleEntry<H> {
    fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }
}

/// Minimal observable record of one occupied slot.
///
/// Only the readiness flag is exposed; an empty slot projects to
/// `None` rather than a `HandleStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandleStatus {
    /// Whether the handle reports itself connected.
    pub ready: bool,
}

impl HandleStatus {
    /// Samples the live readiness flag of `handle`.
    #[must_use]
    pub fn of<H: HandleState>(handle: &H) -> Self {
        Self {
            ready: handle.is_ready(),
        }
    }
}

impl<H: HandleState> From<&HandleEntry<H>> for HandleStatus {
    fn from(entry: &HandleEntry<H>) -> Self {
        Self::of(entry)
    }
}

/// Before/after registry projection returned by every mutating operation.
///
/// `before` is the position-wise status of the registry as fetched at
/// the start of the mutation, `after` the state that was persisted.
/// A slot cleared by removal shows as `None` in `after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Position-wise statuses before the mutation.
    pub before: Vec<Option<HandleStatus>>,

    /// Position-wise statuses after the mutation.
    pub after: Vec<Option<HandleStatus>>,
}

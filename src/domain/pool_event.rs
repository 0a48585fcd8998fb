//! Domain events reflecting registry mutations.
//!
//! Every mutating pool operation publishes a [`PoolEvent`] through the
//! [`super::EventBus`]. Events carry the same before/after status
//! projections the operation returned, so observers see exactly what
//! the caller saw.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClientId, HandleStatus};

/// Which registry an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// The producer registry.
    Producer,
    /// The consumer registry.
    Consumer,
}

/// Domain event emitted after every registry mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PoolEvent {
    /// Emitted when a handle is created and inserted.
    HandleCreated {
        /// Registry kind.
        kind: HandleKind,
        /// Slot index the handle now occupies.
        index: usize,
        /// Pool-assigned handle identifier.
        client_id: ClientId,
        /// Registry projection before insertion.
        before: Vec<Option<HandleStatus>>,
        /// Registry projection after insertion.
        after: Vec<Option<HandleStatus>>,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a handle is closed and its slot cleared.
    HandleRemoved {
        /// Registry kind.
        kind: HandleKind,
        /// Slot index that was cleared.
        index: usize,
        /// Identifier of the removed handle.
        client_id: ClientId,
        /// Registry projection before removal.
        before: Vec<Option<HandleStatus>>,
        /// Registry projection after removal.
        after: Vec<Option<HandleStatus>>,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a registry is fully replaced by `reset`.
    RegistryReset {
        /// Registry kind.
        kind: HandleKind,
        /// Number of handles that were closed by the reset.
        closed: usize,
        /// Reset timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl PoolEvent {
    /// Returns the registry kind this event concerns.
    #[must_use]
    pub const fn kind(&self) -> HandleKind {
        match self {
            Self::HandleCreated { kind, .. }
            | Self::HandleRemoved { kind, .. }
            | Self::RegistryReset { kind, .. } => *kind,
        }
    }

    /// Returns the snake_case event type discriminator.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::HandleCreated { .. } => "handle_created",
            Self::HandleRemoved { .. } => "handle_removed",
            Self::RegistryReset { .. } => "registry_reset",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn event_type_matches_serde_tag() {
        let event = PoolEvent::RegistryReset {
            kind: HandleKind::Producer,
            closed: 2,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert!(json.contains(r#""event_type":"registry_reset""#));
        assert!(json.contains(r#""kind":"producer""#));
        assert_eq!(event.event_type_str(), "registry_reset");
    }

    #[test]
    fn kind_accessor_covers_all_variants() {
        let event = PoolEvent::HandleCreated {
            kind: HandleKind::Consumer,
            index: 0,
            client_id: ClientId::new(),
            before: vec![],
            after: vec![Some(HandleStatus { ready: true })],
            timestamp: Utc::now(),
        };
        assert_eq!(event.kind(), HandleKind::Consumer);
    }
}

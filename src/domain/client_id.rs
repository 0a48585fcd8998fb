//! Type-safe broker client identifier.
//!
//! [`ClientId`] is a newtype wrapper around [`uuid::Uuid`] (v4)
//! assigned by the pool to every handle it creates, so handles can be
//! correlated across logs and events independently of their (reusable)
//! registry index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a pooled broker handle.
///
/// Wraps a UUID v4. Generated once when a handle is inserted into a
/// registry and immutable thereafter. Registry indices are reused after
/// removal; client IDs never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    /// Creates a new random `ClientId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ClientId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ClientId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ClientId> for uuid::Uuid {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

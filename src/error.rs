//! Pool error types.
//!
//! [`PoolError`] is the central error type for every fallible pool
//! operation. Each variant maps to one of the three failure categories
//! the pool distinguishes: validation, not-found, and collaborator
//! (broker-side) failures.

use crate::broker::BrokerError;

/// Failure category for a [`PoolError`].
///
/// | Category   | Meaning                                    |
/// |------------|--------------------------------------------|
/// | Validation | The request references an empty slot       |
/// | NotFound   | No handle exists at the addressed index    |
/// | Connection | The broker collaborator reported a failure |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad request: the addressed slot is empty or out of range.
    Validation,
    /// No handle at the addressed index.
    NotFound,
    /// Error raised by the underlying broker client.
    Connection,
}

/// Error type for all pool operations.
///
/// Validation and not-found errors are raised before any registry
/// mutation, so a failed operation always leaves the registry exactly
/// as it was.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The slot at `index` is empty or `index` is out of range.
    ///
    /// Raised by removal; an out-of-range index is reported the same
    /// way as an already-cleared slot.
    #[error("slot {index} is empty")]
    SlotEmpty {
        /// The offending registry index.
        index: usize,
    },

    /// No producer handle at `index`.
    #[error("producer not found at index {index}")]
    ProducerNotFound {
        /// The offending registry index.
        index: usize,
    },

    /// No consumer handle at `index`.
    #[error("consumer not found at index {index}")]
    ConsumerNotFound {
        /// The offending registry index.
        index: usize,
    },

    /// Error propagated from the broker collaborator.
    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),
}

impl PoolError {
    /// Returns the failure category for this variant.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::SlotEmpty { .. } => ErrorCategory::Validation,
            Self::ProducerNotFound { .. } | Self::ConsumerNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::Broker(_) => ErrorCategory::Connection,
        }
    }
}

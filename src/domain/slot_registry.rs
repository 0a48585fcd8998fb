//! Index-stable slot storage for broker handles.
//!
//! [`SlotRegistry`] is an ordered sequence of optional slots. Removing
//! a handle only nils its slot; it never shifts other handles'
//! positions. Insertion reuses the lowest-indexed empty slot and
//! appends only when no slot is free. Concurrency lives a layer up: the
//! owning pool wraps the registry in a [`tokio::sync::RwLock`] and
//! holds the write half across whole mutation pipelines.

use crate::broker::HandleState;

use super::HandleStatus;

/// Ordered collection of optional handle slots.
///
/// # Invariants
///
/// - Indices are stable: [`SlotRegistry::clear`] leaves the sequence
///   length unchanged and touches no other slot.
/// - [`SlotRegistry::fill_or_append`] grows the sequence only when no
///   empty slot exists.
#[derive(Debug)]
pub struct SlotRegistry<H> {
    slots: Vec<Option<H>>,
}

impl<H> SlotRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Returns the index of the first empty slot, scanning in order.
    ///
    /// Returns `None` both when every slot is occupied and when the
    /// registry is empty; callers that need to distinguish the two can
    /// check [`SlotRegistry::len`].
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Inserts `item` into the first empty slot, or appends it when no
    /// slot is free. Returns the index the item now occupies.
    ///
    /// On an empty registry this appends at index 0.
    pub fn fill_or_append(&mut self, item: H) -> usize {
        match self.first_empty() {
            Some(index) => {
                if let Some(slot) = self.slots.get_mut(index) {
                    *slot = Some(item);
                }
                index
            }
            None => {
                self.slots.push(Some(item));
                self.slots.len() - 1
            }
        }
    }

    /// Takes the item at `index`, leaving the slot empty.
    ///
    /// The sequence length is unchanged. Returns `None` when the index
    /// is out of range or the slot is already empty; callers validate
    /// occupancy before relying on this primitive.
    pub fn clear(&mut self, index: usize) -> Option<H> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Returns the item at `index`, if the slot is occupied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&H> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns the number of slots, occupied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the registry has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Takes every occupied item, leaving a registry with no slots.
    pub fn drain(&mut self) -> Vec<H> {
        self.slots.drain(..).flatten().collect()
    }
}

impl<H: HandleState> SlotRegistry<H> {
    /// Position-wise status projection of the registry.
    ///
    /// Occupied slots project to their live readiness flag, empty slots
    /// to `None`.
    #[must_use]
    pub fn statuses(&self) -> Vec<Option<HandleStatus>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(HandleStatus::of))
            .collect()
    }
}

impl<H> Default for SlotRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

//! Entity handles scoped to a single world model.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_MODEL: AtomicU32 = AtomicU32::new(1);

/// Identity of one world model.
///
/// Every world model receives a fresh id when it is created, so entity
/// handles minted by one model can never be mistaken for another's.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelId(u32);

impl ModelId {
    /// Issues a model id that has not been handed out before in this process.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_MODEL.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelId({})", self.0)
    }
}

/// Opaque handle to an entity slot in a world model.
///
/// Two handles are equal iff they denote the same slot of the same model.
/// Entities are never destroyed individually, so there is no generation
/// counter: a handle stays valid for the lifetime of its model.
///
/// # Layout
/// - `model`: the owning world model
/// - `index`: 64-bit slot index, allocated sequentially from zero
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId {
    /// The world model that owns this entity.
    pub model: ModelId,
    /// Slot index within the owning model.
    pub index: u64,
}

impl EntityId {
    /// Creates an entity handle for the given model and slot.
    #[must_use]
    pub const fn new(model: ModelId, index: u64) -> Self {
        Self { model, index }
    }

    /// Returns true if this handle was minted by `model`.
    #[must_use]
    pub fn belongs_to(self, model: ModelId) -> bool {
        self.model == model
    }

    /// Positional comparison of two entity sequences.
    ///
    /// True iff both sequences have the same length and denote the same
    /// entities in the same order.
    #[must_use]
    pub fn same_entities(left: &[EntityId], right: &[EntityId]) -> bool {
        left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}@m{})", self.index, self.model.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.index)
    }
}

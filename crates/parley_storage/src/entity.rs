//! Entity allocation for one world model.
//!
//! Entities are allocated sequentially and never destroyed, so validation
//! only has to check ownership and the allocation high-water mark.

use parley_foundation::{EntityId, Error, ModelId, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Allocates entity handles for a single model.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityStore {
    /// The model every handle is stamped with.
    model: ModelId,
    /// Number of entities allocated so far.
    allocated: u64,
}

impl EntityStore {
    /// Creates an empty store for `model`.
    #[must_use]
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            allocated: 0,
        }
    }

    /// The model this store allocates for.
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Allocates a fresh entity.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId::new(self.model, self.allocated);
        self.allocated += 1;
        id
    }

    /// Returns true if `id` was allocated by this store.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        id.belongs_to(self.model) && id.index < self.allocated
    }

    /// Validates that `id` was allocated by this store.
    ///
    /// Returns `ForeignEntity` for handles minted by another model and
    /// `UnknownEntity` for indices past the allocation mark.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        if !id.belongs_to(self.model) {
            return Err(Error::foreign_entity(id));
        }
        if id.index >= self.allocated {
            return Err(Error::unknown_entity(id));
        }
        Ok(())
    }

    /// Number of allocated entities.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.allocated
    }

    /// Returns true if nothing has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Iterates over every allocated entity in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.allocated).map(|i| EntityId::new(self.model, i))
    }

    /// Returns a store with the same allocation mark under a new model id.
    #[must_use]
    pub fn restamped(&self, model: ModelId) -> Self {
        Self {
            model,
            allocated: self.allocated,
        }
    }
}

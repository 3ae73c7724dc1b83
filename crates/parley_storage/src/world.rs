//! The world model: entities, string values, and asserted facts.
//!
//! A `WorldModel` is backed by persistent collections, so cloning it is
//! O(1). The language engine parses against a clone and hands the clone
//! back; the processor commits it only when the cycle goes ahead.
//!
//! Every mutating operation bumps the revision and sets the
//! refresh-pending flag. Writing a string value that is already present is
//! not a mutation.

use std::fmt::Write as _;

use parley_foundation::{Arguments, EntityId, ModelId, Result, SharedMap, SharedVec};

use crate::entity::EntityStore;
use crate::fact::Fact;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value given to the distinguished user entity.
pub const USER_VALUE: &str = "user";
/// Value given to the distinguished computer entity.
pub const COMPUTER_VALUE: &str = "computer";

/// Mutable store of entities and facts for one processor.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldModel {
    entities: EntityStore,
    values: SharedMap<EntityId, String>,
    facts: SharedVec<Fact>,
    revision: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    refresh_pending: bool,
}

impl WorldModel {
    /// Creates a world holding only the user and computer entities.
    ///
    /// A new world starts refresh-pending: it has no description yet.
    #[must_use]
    pub fn new() -> Self {
        let mut entities = EntityStore::new(ModelId::fresh());
        let user = entities.spawn();
        let computer = entities.spawn();
        let values = SharedMap::new()
            .insert(user, USER_VALUE.to_string())
            .insert(computer, COMPUTER_VALUE.to_string());

        Self {
            entities,
            values,
            facts: SharedVec::new(),
            revision: 0,
            refresh_pending: true,
        }
    }

    /// Identity of this world.
    #[must_use]
    pub fn id(&self) -> ModelId {
        self.entities.model()
    }

    /// The entity standing for the person typing.
    #[must_use]
    pub fn user(&self) -> EntityId {
        EntityId::new(self.id(), 0)
    }

    /// The entity standing for the program itself.
    #[must_use]
    pub fn computer(&self) -> EntityId {
        EntityId::new(self.id(), 1)
    }

    /// Returns true if `entity` is the user.
    #[must_use]
    pub fn is_user(&self, entity: EntityId) -> bool {
        entity == self.user()
    }

    /// Returns true if `entity` is the computer.
    #[must_use]
    pub fn is_computer(&self, entity: EntityId) -> bool {
        entity == self.computer()
    }

    // =========================================================================
    // Entities and values
    // =========================================================================

    /// Allocates a fresh entity with no value.
    pub fn new_entity(&mut self) -> EntityId {
        let id = self.entities.spawn();
        self.touch();
        id
    }

    /// Returns true if `entity` lives in this world.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.exists(entity)
    }

    /// Validates that `entity` lives in this world.
    pub fn validate(&self, entity: EntityId) -> Result<()> {
        self.entities.validate(entity)
    }

    /// Number of entities.
    #[must_use]
    pub fn entity_count(&self) -> u64 {
        self.entities.len()
    }

    /// Every entity in allocation order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }

    /// The string value of `entity`, if one has been set.
    pub fn string_value(&self, entity: EntityId) -> Result<Option<&str>> {
        self.validate(entity)?;
        Ok(self.values.get(&entity).map(String::as_str))
    }

    /// Sets the string value of `entity`.
    ///
    /// Returns `Ok(true)` if the value changed. Writing the current value
    /// again returns `Ok(false)` and leaves the refresh flag alone.
    pub fn set_string_value(&mut self, entity: EntityId, value: impl Into<String>) -> Result<bool> {
        self.validate(entity)?;
        let value = value.into();
        if self.values.get(&entity) == Some(&value) {
            return Ok(false);
        }
        self.values.insert_mut(entity, value);
        self.touch();
        Ok(true)
    }

    /// Entities whose string value equals `value`, in allocation order.
    pub fn entities_with_value<'a>(&'a self, value: &'a str) -> impl Iterator<Item = EntityId> + 'a {
        self.values
            .iter()
            .filter(move |(_, v)| v.as_str() == value)
            .map(|(e, _)| *e)
    }

    /// Every (entity, value) pair in entity order.
    pub fn values(&self) -> impl Iterator<Item = (EntityId, &str)> {
        self.values.iter().map(|(e, v)| (*e, v.as_str()))
    }

    // =========================================================================
    // Facts
    // =========================================================================

    /// Appends a fact after checking that every participant lives here.
    ///
    /// Predicate declaration is checked by the caller; the world does not
    /// know the signature.
    pub fn assert_fact(&mut self, fact: Fact) -> Result<()> {
        for entity in fact.arguments.entities() {
            self.validate(entity)?;
        }
        self.facts.push_mut(fact);
        self.touch();
        Ok(())
    }

    /// Every fact in assertion order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    /// Number of facts.
    #[must_use]
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Affirmative facts with `predicate` carrying every binding in `partial`.
    pub fn find_facts<'a>(
        &'a self,
        predicate: &'a str,
        partial: &'a Arguments,
    ) -> impl Iterator<Item = &'a Fact> + 'a {
        self.facts
            .iter()
            .filter(move |f| f.exists && f.matches(predicate, partial))
    }

    /// Returns true if an affirmative matching fact exists.
    #[must_use]
    pub fn holds(&self, predicate: &str, partial: &Arguments) -> bool {
        self.find_facts(predicate, partial).next().is_some()
    }

    /// Entities bound to `keyword` in affirmative facts with `predicate`.
    pub fn entities_with<'a>(
        &'a self,
        predicate: &'a str,
        keyword: &'a str,
    ) -> impl Iterator<Item = EntityId> + 'a {
        self.facts
            .iter()
            .filter(move |f| f.exists && f.predicate == predicate)
            .filter_map(move |f| f.arguments.get(keyword))
            .flat_map(|s| s.iter().copied())
    }

    /// Removes affirmative facts matching `predicate` and `partial`.
    ///
    /// Returns how many were removed.
    pub fn retract(&mut self, predicate: &str, partial: &Arguments) -> usize {
        let before = self.facts.len();
        let kept: SharedVec<Fact> = self
            .facts
            .iter()
            .filter(|f| !(f.exists && f.matches(predicate, partial)))
            .cloned()
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.facts = kept;
            self.touch();
        }
        removed
    }

    // =========================================================================
    // Refresh tracking
    // =========================================================================

    /// Returns true if the cached description is stale.
    #[must_use]
    pub fn refresh_pending(&self) -> bool {
        self.refresh_pending
    }

    /// Forces the next description read to regenerate.
    pub fn mark_refresh_pending(&mut self) {
        self.refresh_pending = true;
    }

    /// Clears the flag after a description has been regenerated.
    pub fn clear_refresh_pending(&mut self) {
        self.refresh_pending = false;
    }

    /// Counter bumped by every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.refresh_pending = true;
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Returns a copy of this world under a fresh model id.
    ///
    /// Every entity handle in values and facts is rewritten, so the copy
    /// shares no entities with the original. The copy is refresh-pending.
    #[must_use]
    pub fn restamped(&self) -> Self {
        let model = ModelId::fresh();
        let rebind = |e: EntityId| EntityId::new(model, e.index);
        Self {
            entities: self.entities.restamped(model),
            values: self
                .values
                .iter()
                .map(|(e, v)| (rebind(*e), v.clone()))
                .collect(),
            facts: self
                .facts
                .iter()
                .map(|f| Fact {
                    arguments: f.arguments.map_entities(rebind),
                    ..f.clone()
                })
                .collect(),
            revision: self.revision,
            refresh_pending: true,
        }
    }

    /// Multi-line dump of entities, values, and facts for debugging.
    #[must_use]
    pub fn representation(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "world m{} (revision {})", self.id().raw(), self.revision);
        let _ = writeln!(out, "entities: {}", self.entity_count());
        for entity in self.entities() {
            match self.values.get(&entity) {
                Some(value) => {
                    let _ = writeln!(out, "  {entity} = {value:?}");
                }
                None => {
                    let _ = writeln!(out, "  {entity}");
                }
            }
        }
        let _ = writeln!(out, "facts: {}", self.facts.len());
        for fact in self.facts() {
            let _ = writeln!(out, "  {fact}");
        }
        out
    }
}

impl Default for WorldModel {
    fn default() -> Self {
        Self::new()
    }
}

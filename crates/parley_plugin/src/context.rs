//! Mediated world access for plugin code.
//!
//! Plugins never receive the world model mutably. Handlers and hooks get a
//! [`WorldContext`], which checks predicate declarations, stamps asserted
//! facts with the plugin's name, and journals every change so the processor
//! can trace it.

use parley_foundation::{Arguments, EntityId, Error, Result};
use parley_storage::WorldModel;

use crate::declaration::Declarations;
use crate::event::Event;

/// Answers whether a predicate or relation was declared.
pub trait SymbolLookup {
    /// Returns true if `symbol` is declared by any registered plugin.
    fn is_declared(&self, symbol: &str) -> bool;
}

impl SymbolLookup for Declarations {
    fn is_declared(&self, symbol: &str) -> bool {
        Declarations::is_declared(self, symbol)
    }
}

/// One change made through a context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldChange {
    /// A new entity was allocated.
    EntityCreated(EntityId),
    /// A string value changed.
    ValueWritten {
        /// The entity written.
        entity: EntityId,
        /// The new value.
        value: String,
    },
    /// A fact was asserted.
    FactAsserted {
        /// Its predicate.
        predicate: String,
    },
    /// Matching facts were retracted.
    FactsRetracted {
        /// Their predicate.
        predicate: String,
        /// How many were removed.
        count: usize,
    },
    /// The plugin asked for the description to be regenerated.
    RefreshRequested,
}

/// A plugin's view of the world during a handler or hook.
pub struct WorldContext<'a> {
    world: &'a mut WorldModel,
    symbols: &'a dyn SymbolLookup,
    plugin: &'a str,
    changes: Vec<WorldChange>,
    messages: Vec<String>,
}

impl<'a> WorldContext<'a> {
    /// Creates a context acting on behalf of `plugin`.
    pub fn new(world: &'a mut WorldModel, symbols: &'a dyn SymbolLookup, plugin: &'a str) -> Self {
        Self {
            world,
            symbols,
            plugin,
            changes: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Read access to the world.
    #[must_use]
    pub fn world(&self) -> &WorldModel {
        self.world
    }

    /// Name of the plugin this context acts for.
    #[must_use]
    pub fn plugin_name(&self) -> &str {
        self.plugin
    }

    /// Allocates a fresh entity with no value.
    pub fn new_entity(&mut self) -> EntityId {
        let entity = self.world.new_entity();
        self.changes.push(WorldChange::EntityCreated(entity));
        entity
    }

    /// The string value of `entity`.
    pub fn string_value(&self, entity: EntityId) -> Result<Option<&str>> {
        self.world.string_value(entity)
    }

    /// The string value of `entity`, or its handle when it has none.
    #[must_use]
    pub fn display_name(&self, entity: EntityId) -> String {
        match self.world.string_value(entity) {
            Ok(Some(value)) => value.to_string(),
            _ => entity.to_string(),
        }
    }

    /// Sets the string value of `entity`. Rewriting the current value is a
    /// no-op.
    pub fn set_string_value(&mut self, entity: EntityId, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if self.world.set_string_value(entity, value.clone())? {
            self.changes.push(WorldChange::ValueWritten { entity, value });
        }
        Ok(())
    }

    /// Asserts a fact with `predicate`, which must have been declared.
    ///
    /// The fact is visible to later reads immediately but is never
    /// dispatched in the current cycle.
    pub fn assert_event(&mut self, predicate: &str, arguments: Arguments) -> Result<()> {
        self.assert(&Event::new(predicate).with_arguments(arguments))
    }

    /// Asserts an event as a fact, keeping its existence flag.
    pub fn assert(&mut self, event: &Event) -> Result<()> {
        if !self.symbols.is_declared(event.predicate()) {
            return Err(Error::undeclared_predicate(event.predicate()));
        }
        let fact = event.to_fact().asserted_by(self.plugin);
        self.world.assert_fact(fact)?;
        self.changes.push(WorldChange::FactAsserted {
            predicate: event.predicate().to_string(),
        });
        Ok(())
    }

    /// Removes affirmative facts matching `predicate` and `partial`.
    pub fn retract(&mut self, predicate: &str, partial: &Arguments) -> Result<usize> {
        if !self.symbols.is_declared(predicate) {
            return Err(Error::undeclared_predicate(predicate));
        }
        let count = self.world.retract(predicate, partial);
        if count > 0 {
            self.changes.push(WorldChange::FactsRetracted {
                predicate: predicate.to_string(),
                count,
            });
        }
        Ok(count)
    }

    /// Forces the next description read to regenerate.
    pub fn set_should_refresh(&mut self) {
        self.world.mark_refresh_pending();
        self.changes.push(WorldChange::RefreshRequested);
    }

    /// Queues a line of output for the user.
    pub fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Changes made so far.
    #[must_use]
    pub fn changes(&self) -> &[WorldChange] {
        &self.changes
    }

    /// Messages queued so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consumes the context, returning its journal and messages.
    #[must_use]
    pub fn finish(self) -> (Vec<WorldChange>, Vec<String>) {
        (self.changes, self.messages)
    }
}

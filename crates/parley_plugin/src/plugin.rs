//! The plugin trait and its type-erased host.
//!
//! Plugin authors implement [`Plugin`] on their own state type. The
//! processor stores plugins as `Box<dyn DynPlugin>`, which [`PluginHost`]
//! provides for any `P: Plugin` by capturing its declarations and dispatch
//! table once, at construction.

use std::any::Any;
use std::collections::BTreeSet;

use parley_foundation::{EntityId, Error, ErrorKind, Result};

use crate::context::WorldContext;
use crate::declaration::Declarations;
use crate::dispatch::{Candidate, DispatchTable};
use crate::event::Event;
use crate::event_set::EventSet;

/// Outcome of a handler: `Ok(())` on success, an error describing why the
/// event could not be executed otherwise.
pub type HandlerResult = Result<()>;

/// A named bundle of grammar declarations and a dispatch table.
pub trait Plugin: 'static {
    /// Unique name within a processor.
    fn name(&self) -> &str;

    /// Declares predicates, relations, and lexical entries.
    fn declare(&self, declarations: &mut Declarations);

    /// Builds the dispatch table.
    fn dispatch_table(&self) -> DispatchTable<Self>
    where
        Self: Sized;

    /// Called once when the processor finishes setup.
    fn setup(&mut self, _context: &mut WorldContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called every time the world description is regenerated.
    fn analyze_world(&mut self, _context: &mut WorldContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// What a handler receives besides the world.
pub struct Invocation<'a> {
    event: &'a Event,
    event_set: &'a EventSet,
    keywords: &'a BTreeSet<String>,
}

impl<'a> Invocation<'a> {
    /// Bundles an event with its set and the keywords the entry required.
    #[must_use]
    pub fn new(event: &'a Event, event_set: &'a EventSet, keywords: &'a BTreeSet<String>) -> Self {
        Self {
            event,
            event_set,
            keywords,
        }
    }

    /// The event being handled.
    #[must_use]
    pub fn event(&self) -> &'a Event {
        self.event
    }

    /// Every event of the same parse, including this one.
    #[must_use]
    pub fn event_set(&self) -> &'a EventSet {
        self.event_set
    }

    /// The event's predicate.
    #[must_use]
    pub fn predicate(&self) -> &'a str {
        self.event.predicate()
    }

    /// Keywords the matched entry required.
    pub fn keywords(&self) -> impl Iterator<Item = &'a str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Entities bound to `keyword`; empty when unbound.
    #[must_use]
    pub fn argument(&self, keyword: &str) -> &'a [EntityId] {
        self.event.arguments_for(keyword).unwrap_or(&[])
    }

    /// The single entity bound to `keyword`.
    ///
    /// Fails with an invalid-event error when the keyword binds zero or
    /// several entities.
    pub fn single(&self, keyword: &str) -> Result<EntityId> {
        match self.argument(keyword) {
            [entity] => Ok(*entity),
            [] => Err(self.invalid(format!("missing {keyword}"))),
            many => Err(self.invalid(format!(
                "expected one {keyword}, got {}",
                many.len()
            ))),
        }
    }

    /// Builds an invalid-event error for this event.
    #[must_use]
    pub fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::invalid_event(self.predicate(), reason)
    }
}

/// Object-safe view of a hosted plugin.
pub trait DynPlugin {
    /// Unique name within a processor.
    fn name(&self) -> &str;

    /// Declarations captured at construction.
    fn declarations(&self) -> &Declarations;

    /// Predicates with at least one dispatch entry.
    fn handled_predicates(&self) -> Vec<&str>;

    /// The most specific entry satisfied by `event`.
    fn best_match(&self, event: &Event) -> Option<Candidate>;

    /// Runs the handler of entry `entry`.
    fn invoke(
        &mut self,
        entry: usize,
        event: &Event,
        event_set: &EventSet,
        context: &mut WorldContext<'_>,
    ) -> HandlerResult;

    /// Runs the setup hook.
    fn setup(&mut self, context: &mut WorldContext<'_>) -> Result<()>;

    /// Runs the world-analysis hook.
    fn analyze_world(&mut self, context: &mut WorldContext<'_>) -> Result<()>;

    /// The plugin state, for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Hosts a concrete plugin behind [`DynPlugin`].
pub struct PluginHost<P: Plugin> {
    plugin: P,
    name: String,
    declarations: Declarations,
    table: DispatchTable<P>,
}

impl<P: Plugin> PluginHost<P> {
    /// Captures the plugin's name, declarations, and dispatch table.
    #[must_use]
    pub fn new(plugin: P) -> Self {
        let mut declarations = Declarations::new();
        plugin.declare(&mut declarations);
        let table = plugin.dispatch_table();
        let name = plugin.name().to_string();
        Self {
            plugin,
            name,
            declarations,
            table,
        }
    }

    /// Hosts `plugin` and boxes it for registration.
    #[must_use]
    pub fn boxed(plugin: P) -> Box<dyn DynPlugin> {
        Box::new(Self::new(plugin))
    }

    /// The hosted plugin.
    #[must_use]
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// The captured dispatch table.
    #[must_use]
    pub fn table(&self) -> &DispatchTable<P> {
        &self.table
    }
}

impl<P: Plugin> DynPlugin for PluginHost<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    fn handled_predicates(&self) -> Vec<&str> {
        self.table.predicates()
    }

    fn best_match(&self, event: &Event) -> Option<Candidate> {
        self.table.best_match(event)
    }

    fn invoke(
        &mut self,
        entry: usize,
        event: &Event,
        event_set: &EventSet,
        context: &mut WorldContext<'_>,
    ) -> HandlerResult {
        let Some(found) = self.table.get(entry) else {
            return Err(Error::new(ErrorKind::Internal(format!(
                "plugin {} has no dispatch entry {entry}",
                self.name
            ))));
        };
        let handler = found.handler();
        let invocation = Invocation::new(event, event_set, found.keywords());
        handler(&mut self.plugin, &invocation, context)
    }

    fn setup(&mut self, context: &mut WorldContext<'_>) -> Result<()> {
        self.plugin.setup(context)
    }

    fn analyze_world(&mut self, context: &mut WorldContext<'_>) -> Result<()> {
        self.plugin.analyze_world(context)
    }

    fn as_any(&self) -> &dyn Any {
        &self.plugin
    }
}

//! A single decoded action.

use std::fmt;

use parley_foundation::{Arguments, EntityId, ModelId, Result};
use parley_storage::Fact;

use crate::notation;

/// A predicate with keyword-tagged entity arguments.
///
/// Events are built once and never changed: the `with_*` builders consume
/// the event and return a new one. To rebind an argument, build a new event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    predicate: String,
    plugin: Option<String>,
    foreground: bool,
    exists: bool,
    arguments: Arguments,
}

impl Event {
    /// Creates a foreground, affirmative event with no arguments.
    #[must_use]
    pub fn new(predicate: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            plugin: None,
            foreground: true,
            exists: true,
            arguments: Arguments::new(),
        }
    }

    /// Designates the plugin that owns this event.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    /// Binds `keyword` to `entities`.
    #[must_use]
    pub fn with_argument(
        mut self,
        keyword: impl Into<String>,
        entities: impl IntoIterator<Item = EntityId>,
    ) -> Self {
        self.arguments = self.arguments.with(keyword, entities);
        self
    }

    /// Replaces all arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Marks the event as a side effect rather than the primary action.
    #[must_use]
    pub fn background(mut self) -> Self {
        self.foreground = false;
        self
    }

    /// Marks the event as negated or hypothetical.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.exists = false;
        self
    }

    /// The predicate name.
    #[must_use]
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// The owning plugin, when the event designates one.
    #[must_use]
    pub fn plugin_name(&self) -> Option<&str> {
        self.plugin.as_deref()
    }

    /// True for user-facing events, false for side effects.
    #[must_use]
    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// True for affirmative occurrences.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// All argument bindings.
    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Bound keywords in sorted order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.arguments.keywords()
    }

    /// Entities bound to `keyword`.
    #[must_use]
    pub fn arguments_for(&self, keyword: &str) -> Option<&[EntityId]> {
        self.arguments.get(keyword)
    }

    /// Returns true if every keyword in `keywords` is bound.
    pub fn has_keywords<'k>(&self, keywords: impl IntoIterator<Item = &'k str>) -> bool {
        keywords.into_iter().all(|k| self.arguments.contains(k))
    }

    /// The matching primitive.
    ///
    /// True iff the predicate equals `predicate` and every keyword in
    /// `partial` is bound here to a positionally equal entity sequence.
    #[must_use]
    pub fn matches(&self, predicate: &str, partial: &Arguments) -> bool {
        self.predicate == predicate && self.arguments.satisfies(partial)
    }

    /// Builds a background event describing an asserted fact.
    #[must_use]
    pub fn from_fact(fact: &Fact) -> Self {
        Self {
            predicate: fact.predicate.clone(),
            plugin: fact.asserted_by.clone(),
            foreground: false,
            exists: fact.exists,
            arguments: fact.arguments.clone(),
        }
    }

    /// Converts the event into a fact for storage.
    #[must_use]
    pub fn to_fact(&self) -> Fact {
        Fact {
            predicate: self.predicate.clone(),
            arguments: self.arguments.clone(),
            exists: self.exists,
            asserted_by: self.plugin.clone(),
        }
    }

    /// Reads one event in notation form, resolving `eN` against `model`.
    pub fn parse_in(model: ModelId, text: &str) -> Result<Self> {
        notation::parse_event(model, text)
    }
}

/// Renders in notation form: `~!show@shell(obj=[e3], subj=[e1])`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.foreground {
            f.write_str("~")?;
        }
        if !self.exists {
            f.write_str("!")?;
        }
        f.write_str(&self.predicate)?;
        if let Some(plugin) = &self.plugin {
            write!(f, "@{plugin}")?;
        }
        write!(f, "({})", self.arguments)
    }
}

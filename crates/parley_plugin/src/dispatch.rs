//! Dispatch tables.
//!
//! A dispatch table maps `(predicate, required keywords)` to a handler
//! function on the plugin type. Handlers are plain function pointers, so a
//! table is resolved without any string-keyed method lookup.

use std::collections::BTreeSet;
use std::fmt;

use crate::event::Event;
use crate::plugin::{HandlerResult, Invocation};
use crate::context::WorldContext;

/// A handler for one dispatch entry of plugin type `P`.
pub type Handler<P> = fn(&mut P, &Invocation<'_>, &mut WorldContext<'_>) -> HandlerResult;

/// One `(predicate, keywords) -> handler` entry.
pub struct DispatchEntry<P> {
    predicate: String,
    keywords: BTreeSet<String>,
    handler: Handler<P>,
}

impl<P> DispatchEntry<P> {
    /// Creates an entry.
    pub fn new<'k>(
        predicate: impl Into<String>,
        keywords: impl IntoIterator<Item = &'k str>,
        handler: Handler<P>,
    ) -> Self {
        Self {
            predicate: predicate.into(),
            keywords: keywords.into_iter().map(str::to_string).collect(),
            handler,
        }
    }

    /// The predicate this entry handles.
    #[must_use]
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// The keywords an event must bind for this entry to apply.
    #[must_use]
    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    /// The handler function.
    #[must_use]
    pub fn handler(&self) -> Handler<P> {
        self.handler
    }

    /// Number of required keywords; larger is more specific.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if `event` has this predicate and binds every required
    /// keyword. Extra keywords on the event are allowed.
    #[must_use]
    pub fn is_satisfied_by(&self, event: &Event) -> bool {
        event.predicate() == self.predicate
            && event.has_keywords(self.keywords.iter().map(String::as_str))
    }
}

impl<P> Clone for DispatchEntry<P> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            keywords: self.keywords.clone(),
            handler: self.handler,
        }
    }
}

impl<P> fmt::Debug for DispatchEntry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("predicate", &self.predicate)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

/// The best entry a table offers for an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the entry in its table.
    pub entry: usize,
    /// How many keywords the entry requires.
    pub specificity: usize,
}

/// A plugin's ordered dispatch entries.
pub struct DispatchTable<P> {
    entries: Vec<DispatchEntry<P>>,
}

impl<P> DispatchTable<P> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn on<'k>(
        mut self,
        predicate: &str,
        keywords: impl IntoIterator<Item = &'k str>,
        handler: Handler<P>,
    ) -> Self {
        self.add(predicate, keywords, handler);
        self
    }

    /// Adds an entry.
    pub fn add<'k>(
        &mut self,
        predicate: &str,
        keywords: impl IntoIterator<Item = &'k str>,
        handler: Handler<P>,
    ) {
        self.entries
            .push(DispatchEntry::new(predicate, keywords, handler));
    }

    /// Entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[DispatchEntry<P>] {
        &self.entries
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DispatchEntry<P>> {
        self.entries.get(index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Predicates with at least one entry, in first-registration order.
    #[must_use]
    pub fn predicates(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.predicate()) {
                seen.push(entry.predicate());
            }
        }
        seen
    }

    /// The most specific satisfied entry for `event`.
    ///
    /// Among equally specific entries the first registered wins.
    #[must_use]
    pub fn best_match(&self, event: &Event) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if !entry.is_satisfied_by(event) {
                continue;
            }
            let specificity = entry.specificity();
            if best.is_none_or(|b| specificity > b.specificity) {
                best = Some(Candidate {
                    entry: index,
                    specificity,
                });
            }
        }
        best
    }
}

impl<P> Default for DispatchTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for DispatchTable<P> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<P> fmt::Debug for DispatchTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

//! Ordered, immutable collections of events.

use std::fmt;

use parley_foundation::{Arguments, EntityId, ModelId, Result, SharedVec};

use crate::event::Event;
use crate::notation;

/// The events produced by one parse of one input.
///
/// Cloning is O(1); the cached world-model description is handed out as a
/// clone of the same set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventSet {
    events: SharedVec<Event>,
}

impl EventSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if there are no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Events in parse order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Events whose predicate is `predicate` and whose arguments are a
    /// superset of `partial`, in parse order.
    #[must_use]
    pub fn find(&self, predicate: &str, partial: &Arguments) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.matches(predicate, partial))
            .collect()
    }

    /// The first event matching `predicate` and `partial`.
    #[must_use]
    pub fn find_first(&self, predicate: &str, partial: &Arguments) -> Option<&Event> {
        self.events.iter().find(|e| e.matches(predicate, partial))
    }

    /// User-facing events in parse order.
    pub fn foreground(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_foreground())
    }

    /// Every entity mentioned by any event, in order of first mention.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        let mut seen = Vec::new();
        for entity in self.events.iter().flat_map(|e| e.arguments().entities()) {
            if !seen.contains(&entity) {
                seen.push(entity);
            }
        }
        seen
    }

    /// Returns a new set with `event` appended.
    #[must_use]
    pub fn with_event(&self, event: Event) -> Self {
        Self {
            events: self.events.push_back(event),
        }
    }

    /// Reads a `;`-separated set in notation form.
    pub fn parse_in(model: ModelId, text: &str) -> Result<Self> {
        notation::parse_event_set(model, text)
    }
}

impl From<Vec<Event>> for EventSet {
    fn from(events: Vec<Event>) -> Self {
        Self {
            events: SharedVec::from(events),
        }
    }
}

impl FromIterator<Event> for EventSet {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a Event;
    type IntoIter = im::vector::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        (&self.events).into_iter()
    }
}

/// Renders events in notation form separated by `; `.
impl fmt::Display for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{event}")?;
        }
        Ok(())
    }
}

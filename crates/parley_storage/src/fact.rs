//! Asserted facts.

use std::fmt;

use parley_foundation::{Arguments, EntityId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One asserted predicate or relation instance.
///
/// Facts are appended to the world model by plugins (through the processor)
/// and by the language engine when an utterance introduces new entities.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact {
    /// Predicate or relation name.
    pub predicate: String,
    /// Keyword-tagged participants.
    pub arguments: Arguments,
    /// False for negated assertions.
    pub exists: bool,
    /// Name of the plugin that asserted it, if any.
    pub asserted_by: Option<String>,
}

impl Fact {
    /// Creates an affirmative fact with no recorded asserter.
    #[must_use]
    pub fn new(predicate: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            predicate: predicate.into(),
            arguments,
            exists: true,
            asserted_by: None,
        }
    }

    /// Marks the fact as negated.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.exists = false;
        self
    }

    /// Records the plugin that asserted the fact.
    #[must_use]
    pub fn asserted_by(mut self, plugin: impl Into<String>) -> Self {
        self.asserted_by = Some(plugin.into());
        self
    }

    /// Returns true if the fact has `predicate` and carries every binding in `partial`.
    #[must_use]
    pub fn matches(&self, predicate: &str, partial: &Arguments) -> bool {
        self.predicate == predicate && self.arguments.satisfies(partial)
    }

    /// Returns true if `entity` appears under any keyword.
    #[must_use]
    pub fn mentions(&self, entity: EntityId) -> bool {
        self.arguments.entities().any(|e| e == entity)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.exists {
            f.write_str("!")?;
        }
        write!(f, "{}({})", self.predicate, self.arguments)
    }
}

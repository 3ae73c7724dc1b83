//! The language engine boundary.

use parley_foundation::{Mood, Result};
use parley_plugin::{Declarations, EventSet};
use parley_storage::WorldModel;

use crate::grammar::Grammar;

/// The result of parsing one utterance.
#[derive(Clone, Debug)]
pub struct Parse {
    /// Grammatical mood of the utterance.
    pub mood: Mood,
    /// Decoded events, in utterance order.
    pub events: EventSet,
    /// The world the events refer to.
    ///
    /// Parsing may introduce entities (`a directory named docs`), so the
    /// engine returns an updated copy. The caller decides whether to keep it.
    pub world: WorldModel,
}

/// Text in, events out, and back again.
///
/// Implementations must not retain references to the world or grammar
/// between calls.
pub trait LanguageEngine: Send + Sync {
    /// Builds a grammar from `(plugin name, declarations)` pairs.
    fn compile(&self, plugins: &[(&str, &Declarations)]) -> Result<Grammar> {
        Grammar::compile(plugins)
    }

    /// Parses `input` against `grammar` and `world`.
    ///
    /// Fails with an invalid-input error when no event set can be produced.
    /// `world` itself is never modified.
    fn parse(&self, grammar: &Grammar, world: &WorldModel, input: &str) -> Result<Parse>;

    /// Renders `events` as text.
    fn render(&self, grammar: &Grammar, events: &EventSet, world: &WorldModel) -> Result<String>;

    /// Summarizes `world` as an event set.
    fn describe(&self, world: &WorldModel) -> EventSet;
}

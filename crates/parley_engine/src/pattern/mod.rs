//! A small pattern-based English engine.
//!
//! `PatternEngine` understands simple clauses built from the words plugins
//! declare: `go to docs`, `i went home`, `make a directory named src`,
//! `don't show the directories`, `did you copy "my notes" to backup?`.
//! It is the default backend and the one the tests run against.
//!
//! Properties introduced by nouns are stored as facts with a single
//! [`PROPERTY_KEYWORD`] argument: `directory(subj=[e4])`.

mod parser;
mod render;

use parley_foundation::{Arguments, Error, Mood, Result};
use parley_plugin::{Event, EventSet, Inflection};
use parley_storage::WorldModel;

use crate::backend::{LanguageEngine, Parse};
use crate::grammar::Grammar;
use crate::tokenizer::{Token, tokenize};

use parser::ClauseParser;

/// Keyword binding the entity a property holds of.
pub const PROPERTY_KEYWORD: &str = "subj";

/// Predicate of the per-entity events in a world description.
pub const VALUE_PREDICATE: &str = "value";

const WH_WORDS: &[&str] = &["what", "who", "whom", "which", "where", "when", "why", "how"];

const AUXILIARIES: &[&str] = &[
    "do", "does", "did", "is", "are", "am", "was", "were", "can", "could", "will", "would",
    "should", "shall", "may", "might", "must", "have", "has", "had",
];

const NEGATIONS: &[&str] = &["not", "dont", "doesnt", "didnt", "never", "cant", "cannot", "wont"];

const POLITENESS: &[&str] = &["please", "kindly"];

/// The built-in engine.
#[derive(Clone, Debug, Default)]
pub struct PatternEngine;

impl PatternEngine {
    /// Creates the engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classifies an utterance.
    ///
    /// A question mark, a leading wh-word, or a leading auxiliary makes it
    /// interrogative. A leading bare verb (after politeness and negation)
    /// makes it imperative. Everything else is indicative.
    #[must_use]
    pub fn mood(grammar: &Grammar, tokens: &[Token]) -> Mood {
        if tokens.contains(&Token::Question) {
            return Mood::Interrogative;
        }
        let mut words = tokens
            .iter()
            .filter_map(Token::word)
            .skip_while(|w| POLITENESS.contains(w));
        let Some(first) = words.next() else {
            return Mood::Indicative;
        };
        let is_bare_verb = |w: &str| {
            grammar
                .lexicon
                .verb(w)
                .is_some_and(|(_, entry)| entry.is(Inflection::Base))
        };
        if is_bare_verb(first) {
            return Mood::Imperative;
        }
        if WH_WORDS.contains(&first) || AUXILIARIES.contains(&first) {
            return Mood::Interrogative;
        }
        if NEGATIONS.contains(&first) && words.next().is_some_and(is_bare_verb) {
            return Mood::Imperative;
        }
        Mood::Indicative
    }
}

impl LanguageEngine for PatternEngine {
    fn parse(&self, grammar: &Grammar, world: &WorldModel, input: &str) -> Result<Parse> {
        let tokens = tokenize(input);
        let mood = Self::mood(grammar, &tokens);

        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| *t != Token::Question)
            .skip_while(|t| t.word().is_some_and(|w| POLITENESS.contains(&w)))
            .collect();
        if mood == Mood::Interrogative {
            strip_question_words(grammar, &mut tokens);
        }
        if tokens.is_empty() {
            return Err(Error::invalid_input(input, "nothing to understand"));
        }

        let parser = ClauseParser::new(grammar, input, tokens, world.clone());
        let (events, world) = parser.parse(world.computer())?;
        Ok(Parse {
            mood,
            events: EventSet::from(events),
            world,
        })
    }

    fn render(&self, grammar: &Grammar, events: &EventSet, world: &WorldModel) -> Result<String> {
        Ok(render::render(grammar, events, world))
    }

    fn describe(&self, world: &WorldModel) -> EventSet {
        let facts = world.facts().map(Event::from_fact);
        let values = world.values().map(|(entity, _)| {
            Event::new(VALUE_PREDICATE)
                .with_arguments(Arguments::new().with(PROPERTY_KEYWORD, [entity]))
                .background()
        });
        facts.chain(values).collect()
    }
}

/// Drops one leading wh-word and then one leading auxiliary, unless the
/// word is itself a declared verb.
fn strip_question_words(grammar: &Grammar, tokens: &mut Vec<Token>) {
    for list in [WH_WORDS, AUXILIARIES] {
        let strip = tokens
            .first()
            .and_then(Token::word)
            .is_some_and(|w| list.contains(&w) && grammar.lexicon.verb(w).is_none());
        if strip {
            tokens.remove(0);
        }
    }
}

//! Clause and noun phrase parsing for the pattern engine.
//!
//! ```text
//! utterance := clause (("then" | "and" <verb>) clause)*
//! clause    := [np] aux* neg* verb [np] (prep np)*
//! np        := atom ("and" atom)*
//! atom      := quoted | pronoun | name
//!            | "the" noun | ("a" | "an") noun [("named" | "called") name]
//!            | ("all" | "every") ["the"] noun | noun
//! ```

use parley_foundation::{Arguments, EntityId, Error, Result};
use parley_plugin::{Category, Event, Inflection};
use parley_storage::{Fact, WorldModel};

use crate::frame::VerbFrame;
use crate::grammar::Grammar;
use crate::tokenizer::Token;

use super::{AUXILIARIES, NEGATIONS, PROPERTY_KEYWORD};

/// Parser state for one utterance.
pub(super) struct ClauseParser<'a> {
    grammar: &'a Grammar,
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    world: WorldModel,
}

impl<'a> ClauseParser<'a> {
    pub(super) fn new(grammar: &'a Grammar, input: &'a str, tokens: Vec<Token>, world: WorldModel) -> Self {
        Self {
            grammar,
            input,
            tokens,
            pos: 0,
            world,
        }
    }

    /// Parses every clause; the first defaults its subject to `subject`.
    pub(super) fn parse(mut self, subject: EntityId) -> Result<(Vec<Event>, WorldModel)> {
        let mut events = Vec::new();
        let mut subject = vec![subject];
        loop {
            let (event, used) = self.clause(&subject)?;
            events.push(event);
            subject = used;

            if self.at_end() {
                break;
            }
            if self.peek_word() == Some("then") {
                self.pos += 1;
            } else if self.peek_word() == Some("and") && self.is_verb_at(self.pos + 1) {
                self.pos += 1;
                if self.peek_word() == Some("then") {
                    self.pos += 1;
                }
            } else {
                return Err(self.unexpected());
            }
        }
        Ok((events, self.world))
    }

    // =========================================================================
    // Clauses
    // =========================================================================

    fn clause(&mut self, default_subject: &[EntityId]) -> Result<(Event, Vec<EntityId>)> {
        let subject = if self.is_verb_at(self.pos) || self.is_modifier_at(self.pos) {
            default_subject.to_vec()
        } else {
            self.noun_phrase()?
        };

        let mut negated = false;
        while let Some(word) = self.peek_word() {
            if NEGATIONS.contains(&word) {
                negated = true;
            } else if !AUXILIARIES.contains(&word) || self.is_verb_at(self.pos) {
                break;
            }
            self.pos += 1;
        }

        let Some(verb) = self.peek_word().map(str::to_string) else {
            return Err(self.invalid("expected a verb"));
        };
        let Some((_, entry)) = self.grammar.lexicon.verb(&verb) else {
            return Err(self.invalid(format!("{verb:?} is not a verb I know")));
        };
        let frame = VerbFrame::parse(&entry.semantics)?;
        self.pos += 1;

        let mut bindings: Vec<(String, Vec<EntityId>)> = Vec::new();
        bind(&mut bindings, &frame.subject, subject.clone());

        if self.starts_noun_phrase() {
            let object = self.noun_phrase()?;
            bind(&mut bindings, &frame.object, object);
        }

        while let Some(word) = self.peek_word() {
            let role = frame
                .preposition_role(word)
                .or_else(|| self.grammar.lexicon.preposition(word))
                .map(str::to_string);
            let Some(role) = role else { break };
            self.pos += 1;
            let entities = self.noun_phrase()?;
            bind(&mut bindings, &role, entities);
        }

        let arguments: Arguments = bindings.into_iter().collect();
        let mut event = Event::new(frame.predicate).with_arguments(arguments);
        if negated {
            event = event.negated();
        }
        Ok((event, subject))
    }

    // =========================================================================
    // Noun phrases
    // =========================================================================

    fn noun_phrase(&mut self) -> Result<Vec<EntityId>> {
        let mut entities = self.atom()?;
        while self.peek_word() == Some("and") && !self.is_verb_at(self.pos + 1) {
            if matches!(self.tokens.get(self.pos + 1).and_then(Token::word), Some("then")) {
                break;
            }
            self.pos += 1;
            for entity in self.atom()? {
                if !entities.contains(&entity) {
                    entities.push(entity);
                }
            }
        }
        Ok(entities)
    }

    fn atom(&mut self) -> Result<Vec<EntityId>> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| self.invalid("expected a noun phrase"))?;
        self.pos += 1;

        let word = match token {
            Token::Quoted(name) => return self.named(&name).map(|e| vec![e]),
            Token::Question => return Err(self.invalid("unexpected '?'")),
            Token::Word(word) => word,
        };

        match word.as_str() {
            "the" => {
                let noun = self.expect_noun()?;
                self.definite(&noun)
            }
            "a" | "an" => {
                let noun = self.expect_noun()?;
                self.introduce(&noun).map(|e| vec![e])
            }
            "all" | "every" => {
                if self.peek_word() == Some("the") {
                    self.pos += 1;
                }
                let noun = self.expect_noun()?;
                let (property, _) = self.property(&noun)?;
                self.every(&property, &noun)
            }
            _ => self.bare(&word),
        }
    }

    fn bare(&mut self, word: &str) -> Result<Vec<EntityId>> {
        let lexicon = &self.grammar.lexicon;
        if let Some(entry) = lexicon.get(word, Category::Pronoun) {
            return match entry.semantics.as_str() {
                "user" => Ok(vec![self.world.user()]),
                "computer" => Ok(vec![self.world.computer()]),
                other => Err(self.invalid(format!("pronoun {word:?} refers to unknown {other:?}"))),
            };
        }
        if let Some(entry) = lexicon.get(word, Category::Name) {
            let value = entry.semantics.clone();
            return self.named(&value).map(|e| vec![e]);
        }
        if self.world.entities_with_value(word).next().is_some() {
            return self.named(word).map(|e| vec![e]);
        }
        if lexicon.noun(word).is_some() {
            return self.definite(word);
        }
        Err(self.invalid(format!("I don't know the word {word:?}")))
    }

    /// `the <noun>`: the unique entity with the property, or all of them for
    /// a plural.
    fn definite(&self, noun: &str) -> Result<Vec<EntityId>> {
        let (property, plural) = self.property(noun)?;
        if plural {
            return self.every(&property, noun);
        }
        let found = self.with_property(&property);
        match found.as_slice() {
            [one] => Ok(vec![*one]),
            [] => Err(self.invalid(format!("there is no {noun}"))),
            _ => Err(self.invalid(format!("which {noun} do you mean?"))),
        }
    }

    fn every(&self, property: &str, noun: &str) -> Result<Vec<EntityId>> {
        let found = self.with_property(property);
        if found.is_empty() {
            return Err(self.invalid(format!("there are no {noun}")));
        }
        Ok(found)
    }

    /// `a <noun> [named X]`: a new entity in the returned world.
    fn introduce(&mut self, noun: &str) -> Result<EntityId> {
        let (property, _) = self.property(noun)?;
        let name = if matches!(self.peek_word(), Some("named" | "called")) {
            self.pos += 1;
            Some(self.name_token()?)
        } else {
            None
        };

        let entity = self.world.new_entity();
        self.world.assert_fact(Fact::new(
            property,
            Arguments::new().with(PROPERTY_KEYWORD, [entity]),
        ))?;
        if let Some(name) = name {
            self.world.set_string_value(entity, name)?;
        }
        Ok(entity)
    }

    /// The earliest entity whose string value is `name`.
    fn named(&self, name: &str) -> Result<EntityId> {
        self.world
            .entities_with_value(name)
            .next()
            .ok_or_else(|| self.invalid(format!("nothing is called {name:?}")))
    }

    fn with_property(&self, property: &str) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = Vec::new();
        for entity in self.world.entities_with(property, PROPERTY_KEYWORD) {
            if !found.contains(&entity) {
                found.push(entity);
            }
        }
        found
    }

    /// The property a noun stands for and whether the form is plural.
    fn property(&self, noun: &str) -> Result<(String, bool)> {
        let (_, entry) = self
            .grammar
            .lexicon
            .noun(noun)
            .ok_or_else(|| self.invalid(format!("{noun:?} is not a noun I know")))?;
        Ok((entry.semantics.clone(), entry.is(Inflection::Plural)))
    }

    fn expect_noun(&mut self) -> Result<String> {
        match self.peek_word() {
            Some(word) if self.grammar.lexicon.noun(word).is_some() => {
                let word = word.to_string();
                self.pos += 1;
                Ok(word)
            }
            _ => Err(self.invalid("expected a noun")),
        }
    }

    fn name_token(&mut self) -> Result<String> {
        let name = match self.tokens.get(self.pos) {
            Some(Token::Word(w) | Token::Quoted(w)) if !w.trim().is_empty() => w.clone(),
            _ => return Err(self.invalid("expected a name")),
        };
        self.pos += 1;
        Ok(name)
    }

    // =========================================================================
    // Lookahead
    // =========================================================================

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek_word(&self) -> Option<&str> {
        self.tokens.get(self.pos).and_then(Token::word)
    }

    fn is_verb_at(&self, pos: usize) -> bool {
        self.tokens
            .get(pos)
            .and_then(Token::word)
            .is_some_and(|w| self.grammar.lexicon.verb(w).is_some())
    }

    fn is_modifier_at(&self, pos: usize) -> bool {
        self.tokens
            .get(pos)
            .and_then(Token::word)
            .is_some_and(|w| NEGATIONS.contains(&w))
    }

    fn starts_noun_phrase(&self) -> bool {
        match self.tokens.get(self.pos) {
            None | Some(Token::Question) => false,
            Some(Token::Quoted(_)) => true,
            Some(Token::Word(w)) => {
                let w = w.as_str();
                if w == "then" || (w == "and" && self.is_verb_at(self.pos + 1)) {
                    return false;
                }
                self.grammar.lexicon.preposition(w).is_none()
            }
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    fn invalid(&self, message: impl Into<String>) -> Error {
        Error::invalid_input(self.input, message)
    }

    fn unexpected(&self) -> Error {
        match self.tokens.get(self.pos) {
            Some(Token::Word(w) | Token::Quoted(w)) => self.invalid(format!("unexpected {w:?}")),
            _ => self.invalid("unexpected input"),
        }
    }
}

/// Binds `entities` to `role`, appending if the role is already bound.
fn bind(bindings: &mut Vec<(String, Vec<EntityId>)>, role: &str, entities: Vec<EntityId>) {
    match bindings.iter_mut().find(|(r, _)| r == role) {
        Some((_, existing)) => existing.extend(entities),
        None => bindings.push((role.to_string(), entities)),
    }
}

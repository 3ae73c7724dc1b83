//! Textual event notation.
//!
//! Events print as `~!pred@plugin(kw=[e1, e2], other=[e3])` and event sets
//! as events joined by `;`. The prefix `~` marks a background event and `!`
//! a negated one. Entity references `eN` are resolved against the model the
//! caller names, so notation can only produce entities of that model.
//!
//! ```text
//! event_set := (event (';' event)*)?
//! event     := ('~' | '!')* ident ('@' ident)? '(' (arg (',' arg)*)? ')'
//! arg       := ident '=' '[' (entity (',' entity)*)? ']'
//! entity    := 'e' digits
//! ```

use parley_foundation::{Arguments, EntityId, Error, ModelId, Result};

use crate::event::Event;
use crate::event_set::EventSet;

/// Parses a single event.
pub fn parse_event(model: ModelId, text: &str) -> Result<Event> {
    let mut cursor = Cursor::new(text, model);
    let event = cursor.event()?;
    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(cursor.error("trailing input after event"));
    }
    Ok(event)
}

/// Parses a `;`-separated event set. Blank input yields an empty set.
pub fn parse_event_set(model: ModelId, text: &str) -> Result<EventSet> {
    let mut cursor = Cursor::new(text, model);
    let mut events = Vec::new();
    cursor.skip_whitespace();
    while !cursor.at_end() {
        events.push(cursor.event()?);
        cursor.skip_whitespace();
        if cursor.eat(';') {
            cursor.skip_whitespace();
        } else if !cursor.at_end() {
            return Err(cursor.error("expected ';' between events"));
        }
    }
    Ok(EventSet::from(events))
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    model: ModelId,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, model: ModelId) -> Self {
        Self {
            text,
            pos: 0,
            model,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::notation(message, self.pos)
    }

    fn ident(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            _ => return Err(self.error("expected identifier")),
        }
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            self.bump();
        }
        Ok(&self.text[start..self.pos])
    }

    fn event(&mut self) -> Result<Event> {
        self.skip_whitespace();
        let mut background = false;
        let mut negated = false;
        loop {
            if self.eat('~') {
                background = true;
            } else if self.eat('!') {
                negated = true;
            } else {
                break;
            }
        }

        let mut event = Event::new(self.ident()?);
        if self.eat('@') {
            event = event.with_plugin(self.ident()?);
        }
        if background {
            event = event.background();
        }
        if negated {
            event = event.negated();
        }

        self.expect('(')?;
        let mut arguments = Arguments::new();
        self.skip_whitespace();
        if !self.eat(')') {
            loop {
                let keyword = self.ident()?;
                if arguments.contains(keyword) {
                    return Err(self.error(&format!("keyword '{keyword}' bound twice")));
                }
                self.expect('=')?;
                let entities = self.entity_list()?;
                arguments = arguments.with(keyword, entities);
                self.skip_whitespace();
                if self.eat(')') {
                    break;
                }
                self.expect(',')?;
            }
        }
        Ok(event.with_arguments(arguments))
    }

    fn entity_list(&mut self) -> Result<Vec<EntityId>> {
        self.expect('[')?;
        let mut entities = Vec::new();
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(entities);
        }
        loop {
            entities.push(self.entity()?);
            self.skip_whitespace();
            if self.eat(']') {
                return Ok(entities);
            }
            self.expect(',')?;
        }
    }

    fn entity(&mut self) -> Result<EntityId> {
        self.skip_whitespace();
        if !self.eat('e') {
            return Err(self.error("expected entity reference like e3"));
        }
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.text[start..self.pos]
            .parse::<u64>()
            .map(|index| EntityId::new(self.model, index))
            .map_err(|_| Error::notation("expected entity index", start))
    }
}

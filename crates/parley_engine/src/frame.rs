//! Verb semantic frames.
//!
//! A verb's semantics is either a bare predicate name or a predicate with a
//! role list: `go(subj,dest)` or `copy(copier,original,to=result)`. The
//! first positional role names the grammatical subject, the second the
//! direct object. `prep=role` entries override the keyword a preposition
//! introduces for this verb only.

use std::fmt;

use parley_foundation::{Error, Result};

/// Keyword given to the subject when the frame does not name one.
pub const DEFAULT_SUBJECT: &str = "subj";
/// Keyword given to the direct object when the frame does not name one.
pub const DEFAULT_OBJECT: &str = "obj";

/// A parsed verb semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbFrame {
    /// The event predicate.
    pub predicate: String,
    /// Keyword for the grammatical subject.
    pub subject: String,
    /// Keyword for the direct object.
    pub object: String,
    /// Preposition overrides, in declaration order.
    pub prepositions: Vec<(String, String)>,
}

impl VerbFrame {
    /// Parses a semantics string.
    pub fn parse(semantics: &str) -> Result<Self> {
        let semantics = semantics.trim();
        let (predicate, roles) = match semantics.split_once('(') {
            None => (semantics, None),
            Some((name, rest)) => {
                let Some(inner) = rest.strip_suffix(')') else {
                    return Err(malformed(semantics, "missing ')'"));
                };
                (name.trim(), Some(inner))
            }
        };
        if !is_identifier(predicate) {
            return Err(malformed(semantics, "bad predicate name"));
        }

        let mut frame = Self {
            predicate: predicate.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            object: DEFAULT_OBJECT.to_string(),
            prepositions: Vec::new(),
        };

        let mut positional = 0;
        for item in roles.into_iter().flat_map(|r| r.split(',')) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if let Some((prep, role)) = item.split_once('=') {
                let (prep, role) = (prep.trim(), role.trim());
                if !is_identifier(prep) || !is_identifier(role) {
                    return Err(malformed(semantics, "bad preposition override"));
                }
                frame
                    .prepositions
                    .push((prep.to_lowercase(), role.to_string()));
                continue;
            }
            if !is_identifier(item) {
                return Err(malformed(semantics, "bad role name"));
            }
            match positional {
                0 => frame.subject = item.to_string(),
                1 => frame.object = item.to_string(),
                _ => return Err(malformed(semantics, "more than two positional roles")),
            }
            positional += 1;
        }

        Ok(frame)
    }

    /// Keyword a preposition introduces under this frame, if overridden.
    #[must_use]
    pub fn preposition_role(&self, preposition: &str) -> Option<&str> {
        self.prepositions
            .iter()
            .find(|(p, _)| p == preposition)
            .map(|(_, r)| r.as_str())
    }

    /// Preposition that introduces `role` under this frame, if overridden.
    #[must_use]
    pub fn preposition_for(&self, role: &str) -> Option<&str> {
        self.prepositions
            .iter()
            .find(|(_, r)| r == role)
            .map(|(p, _)| p.as_str())
    }
}

impl fmt::Display for VerbFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{}", self.predicate, self.subject, self.object)?;
        for (prep, role) in &self.prepositions {
            write!(f, ",{prep}={role}")?;
        }
        write!(f, ")")
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn malformed(semantics: &str, detail: &str) -> Error {
    Error::setup_conflict(semantics, format!("malformed verb semantics: {detail}"))
}

//! Grammatical mood of a parsed utterance.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The mood a language engine assigns to one utterance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mood {
    /// A statement of fact ("the box is red").
    Indicative,
    /// A command ("open the box").
    Imperative,
    /// A question ("is the box red?").
    Interrogative,
}

impl Mood {
    /// All moods, in declaration order.
    pub const ALL: [Mood; 3] = [Mood::Indicative, Mood::Imperative, Mood::Interrogative];

    /// Lowercase name of the mood.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Indicative => "indicative",
            Self::Imperative => "imperative",
            Self::Interrogative => "interrogative",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

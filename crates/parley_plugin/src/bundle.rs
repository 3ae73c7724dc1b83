//! Reusable declaration bundles.
//!
//! Plugins compose these into their own declarations instead of inheriting
//! a base vocabulary. Identical declarations from several plugins merge
//! without conflict when the grammar is compiled.

use crate::declaration::{Category, Declarations};

/// A named, reusable set of declarations.
#[derive(Clone, Debug)]
pub struct DeclarationBundle {
    name: &'static str,
    declarations: Declarations,
}

impl DeclarationBundle {
    /// Creates a bundle from prepared declarations.
    #[must_use]
    pub fn new(name: &'static str, declarations: Declarations) -> Self {
        Self { name, declarations }
    }

    /// Symbols every world description relies on.
    ///
    /// - `value`: one-place predicate describing an entity with a string value
    /// - `same`: identity relation between two entity sequences
    #[must_use]
    pub fn base() -> Self {
        let mut decl = Declarations::new();
        decl.add_predicate("value").add_relation("same");
        Self::new("base", decl)
    }

    /// English function words: prepositions mapped to argument keywords and
    /// personal pronouns mapped to the user and computer entities.
    #[must_use]
    pub fn english() -> Self {
        let mut decl = Declarations::new();
        for (form, keyword) in [
            ("to", "dest"),
            ("into", "dest"),
            ("onto", "dest"),
            ("from", "source"),
            ("with", "instrument"),
            ("in", "location"),
            ("inside", "location"),
            ("at", "location"),
            ("about", "topic"),
            ("for", "beneficiary"),
        ] {
            decl.add_lexical_entry(form, Category::Preposition, keyword);
        }
        for (form, referent) in [
            ("i", "user"),
            ("me", "user"),
            ("myself", "user"),
            ("you", "computer"),
            ("yourself", "computer"),
        ] {
            decl.add_lexical_entry(form, Category::Pronoun, referent);
        }
        Self::new("english", decl)
    }

    /// The bundle's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The bundled declarations.
    #[must_use]
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}

//! Grammar declarations a plugin contributes.
//!
//! A plugin declares the predicates and relations its events use and the
//! words that express them. The language engine compiles the declarations
//! of every registered plugin into one grammar when the processor finishes
//! setup; nothing can be declared after that.

use std::fmt;

use crate::bundle::DeclarationBundle;
use crate::inflect;

/// What kind of symbol a declared name is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    /// An event predicate (`go`, `show`).
    Predicate,
    /// A relation between entities (`contains`).
    Relation,
    /// A one-place property introduced by a noun (`directory`).
    Property,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Predicate => "predicate",
            Self::Relation => "relation",
            Self::Property => "property",
        })
    }
}

/// Grammatical category of a lexical entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Count noun (singular or plural form).
    CountNoun,
    /// Mass noun.
    MassNoun,
    /// Verb taking a subject only.
    IntransitiveVerb,
    /// Verb taking a subject and an object.
    TransitiveVerb,
    /// Preposition; semantics is the argument keyword it introduces.
    Preposition,
    /// Personal pronoun; semantics is `user` or `computer`.
    Pronoun,
    /// Proper name; semantics is the string value it refers to.
    Name,
}

impl Category {
    /// Returns true for verb categories.
    #[must_use]
    pub fn is_verb(self) -> bool {
        matches!(self, Self::IntransitiveVerb | Self::TransitiveVerb)
    }

    /// Returns true for noun categories.
    #[must_use]
    pub fn is_noun(self) -> bool {
        matches!(self, Self::CountNoun | Self::MassNoun)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CountNoun => "count-noun",
            Self::MassNoun => "mass-noun",
            Self::IntransitiveVerb => "intransitive-verb",
            Self::TransitiveVerb => "transitive-verb",
            Self::Preposition => "preposition",
            Self::Pronoun => "pronoun",
            Self::Name => "name",
        })
    }
}

/// Which inflected form a word is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Inflection {
    /// Uninflected form (singular noun, bare verb, function word).
    Base,
    /// Plural noun.
    Plural,
    /// Third-person singular present verb.
    PresentThird,
    /// Simple past.
    Past,
    /// Present participle.
    Progressive,
    /// Past participle in perfect tenses.
    Perfect,
    /// Past participle in passives.
    Passive,
}

/// A word form with its category and semantic translation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LexicalEntry {
    /// Lowercase surface form.
    pub form: String,
    /// Grammatical category.
    pub category: Category,
    /// Semantic translation; for verbs and nouns, the predicate name
    /// (optionally with a role frame, see the engine docs).
    pub semantics: String,
    /// Which form of the lexeme this is.
    pub inflection: Inflection,
}

impl LexicalEntry {
    /// Creates an uninflected entry.
    #[must_use]
    pub fn new(form: impl Into<String>, category: Category, semantics: impl Into<String>) -> Self {
        Self {
            form: form.into().to_lowercase(),
            category,
            semantics: semantics.into(),
            inflection: Inflection::Base,
        }
    }

    /// Sets the inflection.
    #[must_use]
    pub fn inflected(mut self, inflection: Inflection) -> Self {
        self.inflection = inflection;
        self
    }
}

/// Every form of one verb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbForms {
    /// Bare infinitive ("go").
    pub bare: String,
    /// Third-person singular present ("goes").
    pub present_third: String,
    /// Simple past ("went").
    pub past: String,
    /// Present participle ("going").
    pub progressive: String,
    /// Perfect participle ("gone").
    pub perfect: String,
    /// Passive participle ("gone").
    pub passive: String,
}

impl VerbForms {
    /// Derives the paradigm from the bare form.
    #[must_use]
    pub fn regular(bare: &str) -> Self {
        inflect::verb_forms(&bare.to_lowercase())
    }

    /// Forms paired with their inflection tags.
    #[must_use]
    pub fn tagged(&self) -> [(&str, Inflection); 6] {
        [
            (self.bare.as_str(), Inflection::Base),
            (self.present_third.as_str(), Inflection::PresentThird),
            (self.past.as_str(), Inflection::Past),
            (self.progressive.as_str(), Inflection::Progressive),
            (self.perfect.as_str(), Inflection::Perfect),
            (self.passive.as_str(), Inflection::Passive),
        ]
    }
}

/// Predicates, relations, and lexical entries declared by one plugin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    symbols: Vec<(String, SymbolKind)>,
    lexicon: Vec<LexicalEntry>,
    bundles: Vec<&'static str>,
}

impl Declarations {
    /// Creates an empty declaration set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a bundle's declarations into this set.
    ///
    /// Including the same bundle twice has no further effect.
    pub fn include(&mut self, bundle: &DeclarationBundle) -> &mut Self {
        if self.bundles.contains(&bundle.name()) {
            return self;
        }
        self.bundles.push(bundle.name());
        for (name, kind) in bundle.declarations().symbols() {
            self.add_symbol(name, kind);
        }
        for entry in bundle.declarations().lexicon() {
            self.add_entry(entry.clone());
        }
        self
    }

    /// Declares an event predicate.
    pub fn add_predicate(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_symbol(&name.into(), SymbolKind::Predicate)
    }

    /// Declares a relation.
    pub fn add_relation(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_symbol(&name.into(), SymbolKind::Relation)
    }

    /// Adds a raw lexical entry.
    pub fn add_lexical_entry(
        &mut self,
        form: impl Into<String>,
        category: Category,
        semantics: impl Into<String>,
    ) -> &mut Self {
        self.add_entry(LexicalEntry::new(form, category, semantics))
    }

    /// Adds a count noun with explicit singular and plural forms.
    pub fn add_count_noun(&mut self, singular: &str, plural: &str, semantics: &str) -> &mut Self {
        self.add_entry(LexicalEntry::new(singular, Category::CountNoun, semantics));
        self.add_entry(
            LexicalEntry::new(plural, Category::CountNoun, semantics).inflected(Inflection::Plural),
        )
    }

    /// Adds a count noun whose semantics is its singular form and whose
    /// plural follows the spelling rules.
    pub fn auto_add_count_noun(&mut self, singular: &str) -> &mut Self {
        let singular = singular.to_lowercase();
        self.add_count_noun(&singular, &inflect::plural(&singular), &singular)
    }

    /// Adds a mass noun.
    pub fn add_mass_noun(&mut self, form: &str, semantics: &str) -> &mut Self {
        self.add_entry(LexicalEntry::new(form, Category::MassNoun, semantics))
    }

    /// Adds a mass noun whose semantics is its form.
    pub fn auto_add_mass_noun(&mut self, form: &str) -> &mut Self {
        let form = form.to_lowercase();
        self.add_mass_noun(&form, &form)
    }

    /// Adds every form of an intransitive verb.
    pub fn add_intransitive_verb(&mut self, forms: &VerbForms, semantics: &str) -> &mut Self {
        self.add_verb(forms, Category::IntransitiveVerb, semantics)
    }

    /// Adds an intransitive verb with a regular paradigm and semantics equal
    /// to its bare form.
    pub fn auto_add_intransitive_verb(&mut self, bare: &str) -> &mut Self {
        let forms = VerbForms::regular(bare);
        let semantics = forms.bare.clone();
        self.add_intransitive_verb(&forms, &semantics)
    }

    /// Adds every form of a transitive verb.
    pub fn add_transitive_verb(&mut self, forms: &VerbForms, semantics: &str) -> &mut Self {
        self.add_verb(forms, Category::TransitiveVerb, semantics)
    }

    /// Adds a transitive verb with a regular paradigm and semantics equal to
    /// its bare form.
    pub fn auto_add_transitive_verb(&mut self, bare: &str) -> &mut Self {
        let forms = VerbForms::regular(bare);
        let semantics = forms.bare.clone();
        self.add_transitive_verb(&forms, &semantics)
    }

    /// Declared symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolKind)> {
        self.symbols.iter().map(|(n, k)| (n.as_str(), *k))
    }

    /// Declared lexical entries in declaration order.
    pub fn lexicon(&self) -> impl Iterator<Item = &LexicalEntry> {
        self.lexicon.iter()
    }

    /// Names of included bundles.
    #[must_use]
    pub fn bundles(&self) -> &[&'static str] {
        &self.bundles
    }

    /// Returns true if `name` is declared as any kind of symbol.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.symbols.iter().any(|(n, _)| n == name)
    }

    fn add_verb(&mut self, forms: &VerbForms, category: Category, semantics: &str) -> &mut Self {
        for (form, inflection) in forms.tagged() {
            self.add_entry(LexicalEntry::new(form, category, semantics).inflected(inflection));
        }
        self
    }

    fn add_symbol(&mut self, name: &str, kind: SymbolKind) -> &mut Self {
        if !self.symbols.iter().any(|(n, k)| n == name && *k == kind) {
            self.symbols.push((name.to_string(), kind));
        }
        self
    }

    fn add_entry(&mut self, entry: LexicalEntry) -> &mut Self {
        if !self.lexicon.contains(&entry) {
            self.lexicon.push(entry);
        }
        self
    }
}

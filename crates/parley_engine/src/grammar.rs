//! Grammar compilation.
//!
//! The declarations of every registered plugin are merged into one
//! [`Grammar`]: a [`Signature`] of symbols and a [`Lexicon`] of word forms.
//! Identical declarations from several plugins merge; incompatible ones are
//! a setup conflict.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use parley_foundation::{Error, Result};
use parley_plugin::{Category, Declarations, Inflection, LexicalEntry, SymbolKind, SymbolLookup};

use crate::frame::VerbFrame;

// =============================================================================
// Signature
// =============================================================================

/// A declared symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureEntry {
    /// What kind of symbol it is.
    pub kind: SymbolKind,
    /// Plugins that declared it, in registration order.
    pub plugins: Vec<String>,
}

/// Every predicate, relation, and property known to the grammar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    symbols: BTreeMap<String, SignatureEntry>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `symbol` as `kind` on behalf of `plugin`.
    pub fn declare(&mut self, symbol: &str, kind: SymbolKind, plugin: &str) -> Result<()> {
        match self.symbols.get_mut(symbol) {
            Some(entry) if entry.kind != kind => Err(Error::setup_conflict(
                symbol,
                format!(
                    "declared as {} by {} and as {kind} by {plugin}",
                    entry.kind,
                    entry.plugins.join(", ")
                ),
            )),
            Some(entry) => {
                push_unique(&mut entry.plugins, plugin);
                Ok(())
            }
            None => {
                self.symbols.insert(
                    symbol.to_string(),
                    SignatureEntry {
                        kind,
                        plugins: vec![plugin.to_string()],
                    },
                );
                Ok(())
            }
        }
    }

    /// The entry for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&SignatureEntry> {
        self.symbols.get(symbol)
    }

    /// The kind of `symbol`.
    #[must_use]
    pub fn kind(&self, symbol: &str) -> Option<SymbolKind> {
        self.get(symbol).map(|e| e.kind)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SignatureEntry)> {
        self.symbols.iter().map(|(s, e)| (s.as_str(), e))
    }

    /// One line per symbol: `kind name [plugins]`.
    #[must_use]
    pub fn representation(&self) -> String {
        let mut out = String::new();
        for (symbol, entry) in &self.symbols {
            let _ = writeln!(
                out,
                "{} {symbol} [{}]",
                entry.kind,
                entry.plugins.join(", ")
            );
        }
        out
    }
}

impl SymbolLookup for Signature {
    fn is_declared(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }
}

// =============================================================================
// Lexicon
// =============================================================================

/// Everything known about one (form, category) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Semantic translation.
    pub semantics: String,
    /// Which inflections this form realizes.
    pub inflections: BTreeSet<Inflection>,
    /// Plugins that declared it, in registration order.
    pub plugins: Vec<String>,
}

impl LexiconEntry {
    /// Returns true if the form realizes `inflection`.
    #[must_use]
    pub fn is(&self, inflection: Inflection) -> bool {
        self.inflections.contains(&inflection)
    }
}

/// How a predicate is spoken: the frame plus the forms rendering needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbSense {
    /// The verb's semantics as declared.
    pub semantics: String,
    /// The parsed frame.
    pub frame: VerbFrame,
    /// Bare form, if declared.
    pub bare: Option<String>,
    /// Simple past form, if declared.
    pub past: Option<String>,
}

/// Word forms known to the grammar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: BTreeMap<(String, Category), LexiconEntry>,
    prepositions: BTreeMap<String, String>,
    verbs: BTreeMap<String, VerbSense>,
}

impl Lexicon {
    /// Creates an empty lexicon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` on behalf of `plugin`.
    ///
    /// The same form and category with different semantics is a conflict.
    pub fn add(&mut self, entry: &LexicalEntry, plugin: &str) -> Result<()> {
        let key = (entry.form.clone(), entry.category);
        if let Some(existing) = self.entries.get_mut(&key) {
            if existing.semantics != entry.semantics {
                return Err(Error::setup_conflict(
                    &entry.form,
                    format!(
                        "{} means {} for {} but {} for {plugin}",
                        entry.category,
                        existing.semantics,
                        existing.plugins.join(", "),
                        entry.semantics
                    ),
                ));
            }
            existing.inflections.insert(entry.inflection);
            push_unique(&mut existing.plugins, plugin);
        } else {
            self.entries.insert(
                key,
                LexiconEntry {
                    semantics: entry.semantics.clone(),
                    inflections: BTreeSet::from([entry.inflection]),
                    plugins: vec![plugin.to_string()],
                },
            );
        }

        if entry.category == Category::Preposition {
            self.prepositions
                .entry(entry.semantics.clone())
                .or_insert_with(|| entry.form.clone());
        }
        if entry.category.is_verb() {
            self.add_verb_form(entry)?;
        }
        Ok(())
    }

    fn add_verb_form(&mut self, entry: &LexicalEntry) -> Result<()> {
        let frame = VerbFrame::parse(&entry.semantics)?;
        let sense = self
            .verbs
            .entry(frame.predicate.clone())
            .or_insert_with(|| VerbSense {
                semantics: entry.semantics.clone(),
                frame,
                bare: None,
                past: None,
            });
        if sense.semantics != entry.semantics {
            return Ok(());
        }
        match entry.inflection {
            Inflection::Base => {
                sense.bare.get_or_insert_with(|| entry.form.clone());
            }
            Inflection::Past => {
                sense.past.get_or_insert_with(|| entry.form.clone());
            }
            _ => {}
        }
        Ok(())
    }

    /// The entry for `form` in `category`.
    #[must_use]
    pub fn get(&self, form: &str, category: Category) -> Option<&LexiconEntry> {
        self.entries.get(&(form.to_string(), category))
    }

    /// Every category `form` belongs to, in category order.
    pub fn senses<'a>(&'a self, form: &str) -> impl Iterator<Item = (Category, &'a LexiconEntry)> + 'a {
        let lo = (form.to_string(), Category::CountNoun);
        let hi = (form.to_string(), Category::Name);
        self.entries.range(lo..=hi).map(|((_, c), e)| (*c, e))
    }

    /// The first verb sense of `form`.
    #[must_use]
    pub fn verb(&self, form: &str) -> Option<(Category, &LexiconEntry)> {
        self.senses(form).find(|(c, _)| c.is_verb())
    }

    /// The first noun sense of `form`.
    #[must_use]
    pub fn noun(&self, form: &str) -> Option<(Category, &LexiconEntry)> {
        self.senses(form).find(|(c, _)| c.is_noun())
    }

    /// The keyword preposition `form` introduces.
    #[must_use]
    pub fn preposition(&self, form: &str) -> Option<&str> {
        self.get(form, Category::Preposition)
            .map(|e| e.semantics.as_str())
    }

    /// The first declared preposition introducing `keyword`.
    #[must_use]
    pub fn preposition_for(&self, keyword: &str) -> Option<&str> {
        self.prepositions.get(keyword).map(String::as_str)
    }

    /// How `predicate` is spoken, if some verb expresses it.
    #[must_use]
    pub fn verb_sense(&self, predicate: &str) -> Option<&VerbSense> {
        self.verbs.get(predicate)
    }

    /// Number of (form, category) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no word is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in (form, category) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Category, &LexiconEntry)> {
        self.entries.iter().map(|((f, c), e)| (f.as_str(), *c, e))
    }

    /// One line per entry: `form category [inflections] -> semantics`.
    #[must_use]
    pub fn representation(&self) -> String {
        let mut out = String::new();
        for ((form, category), entry) in &self.entries {
            let inflections: Vec<String> = entry
                .inflections
                .iter()
                .map(|i| format!("{i:?}").to_lowercase())
                .collect();
            let _ = writeln!(
                out,
                "{form} {category} [{}] -> {}",
                inflections.join(","),
                entry.semantics
            );
        }
        out
    }
}

// =============================================================================
// Grammar
// =============================================================================

/// A compiled signature and lexicon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grammar {
    /// Declared symbols.
    pub signature: Signature,
    /// Declared words.
    pub lexicon: Lexicon,
}

impl Grammar {
    /// Compiles the declarations of `(plugin name, declarations)` pairs.
    ///
    /// Noun semantics become property symbols and verb frame predicates
    /// become predicate symbols.
    pub fn compile(plugins: &[(&str, &Declarations)]) -> Result<Self> {
        let mut grammar = Self::default();
        for (plugin, declarations) in plugins {
            for (symbol, kind) in declarations.symbols() {
                grammar.signature.declare(symbol, kind, plugin)?;
            }
            for entry in declarations.lexicon() {
                grammar.lexicon.add(entry, plugin)?;
                if entry.category.is_noun() {
                    grammar
                        .signature
                        .declare(&entry.semantics, SymbolKind::Property, plugin)?;
                } else if entry.category.is_verb() {
                    let frame = VerbFrame::parse(&entry.semantics)?;
                    grammar
                        .signature
                        .declare(&frame.predicate, SymbolKind::Predicate, plugin)?;
                }
            }
        }
        Ok(grammar)
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

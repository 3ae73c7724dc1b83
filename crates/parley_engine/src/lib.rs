//! The language engine boundary for Parley.
//!
//! This crate provides:
//! - [`LanguageEngine`] - Compile, parse, render, and describe
//! - [`Engine`] - A backend behind an explicit start/stop bracket, with
//!   one [`EngineLease`] per processor
//! - [`Grammar`] - Signature and lexicon compiled from plugin declarations
//! - [`PatternEngine`] - The built-in English backend
//!
//! # Pipeline
//!
//! ```text
//! "make a directory named src"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → [make, a, directory, named, src]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MOOD            │  → Imperative (leading bare verb)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CLAUSES         │  → make(subj=[e1], obj=[e4]) + new entity e4
//! └─────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod frame;
pub mod grammar;
pub mod lifecycle;
pub mod pattern;
pub mod tokenizer;

pub use backend::{LanguageEngine, Parse};
pub use frame::VerbFrame;
pub use grammar::{Grammar, Lexicon, LexiconEntry, Signature, SignatureEntry, VerbSense};
pub use lifecycle::{Engine, EngineLease};
pub use pattern::{PROPERTY_KEYWORD, PatternEngine, VALUE_PREDICATE};
pub use tokenizer::{Token, tokenize};

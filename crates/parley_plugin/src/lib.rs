//! Events, plugin declarations, and dispatch resolution for Parley.
//!
//! A language engine turns text into an [`EventSet`]. Each [`Event`] is then
//! resolved against the dispatch tables of the registered plugins:
//!
//! ```text
//! ┌──────────┐     ┌────────────────┐     ┌──────────────┐
//! │ EventSet │ ──▶ │ PluginRegistry │ ──▶ │   Handler    │
//! │ (parsed) │     │   (resolve)    │     │ (plugin fn)  │
//! └──────────┘     └────────────────┘     └──────────────┘
//!                          │                     │
//!                          ▼                     ▼
//!                  most specific entry    WorldContext
//!                  first registered wins  (mediated writes)
//! ```
//!
//! # Resolution
//!
//! An entry `(predicate, keywords)` is satisfied by an event when the
//! predicates are equal and every required keyword is bound in the event.
//! Among satisfied entries, the one requiring the most keywords wins; ties go
//! to the earliest registered plugin, then the earliest entry within it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod context;
pub mod declaration;
pub mod dispatch;
pub mod event;
pub mod event_set;
pub mod inflect;
pub mod notation;
pub mod plugin;
pub mod registry;

pub use bundle::DeclarationBundle;
pub use context::{SymbolLookup, WorldChange, WorldContext};
pub use declaration::{Category, Declarations, Inflection, LexicalEntry, SymbolKind, VerbForms};
pub use dispatch::{Candidate, DispatchEntry, DispatchTable, Handler};
pub use event::Event;
pub use event_set::EventSet;
pub use plugin::{DynPlugin, HandlerResult, Invocation, Plugin, PluginHost};
pub use registry::{PluginRegistry, Resolution};

//! Parley - Plugin-based bridge from parsed English to domain handlers
//!
//! This crate re-exports all layers of the Parley system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: parley_runtime    - Processor, demo shell, REPL, CLI, snapshots
//! Layer 3: parley_engine     - Language engine boundary, grammar, pattern engine
//!          parley_debug      - Cycle tracing
//! Layer 2: parley_plugin     - Events, declarations, dispatch tables, registry
//! Layer 1: parley_storage    - World model: entities, values, facts
//! Layer 0: parley_foundation - Core types (EntityId, Mood, Arguments, Error)
//! ```

pub use parley_debug as debug;
pub use parley_engine as engine;
pub use parley_foundation as foundation;
pub use parley_plugin as plugin;
pub use parley_runtime as runtime;
pub use parley_storage as storage;

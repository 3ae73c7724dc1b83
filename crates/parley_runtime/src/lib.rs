//! Processor, REPL, CLI, and snapshots for Parley.
//!
//! This crate provides:
//! - [`Processor`] - Turns English input into handler calls and back
//! - [`ShellPlugin`] - A directory-navigation plugin to talk to
//! - [`Repl`] - Interactive read-eval-print loop
//! - World snapshot serialization

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod processor;
pub mod repl;
pub mod report;
pub mod serialize;
pub mod shell;

pub use config::ProcessorConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use processor::{Processor, ProcessorState};
pub use repl::{Repl, Reply};
pub use report::{CycleReport, EventOutcome};
pub use shell::{SHELL_PLUGIN, ShellPlugin};

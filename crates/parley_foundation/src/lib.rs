//! Entity handles, moods, errors, and persistent collections for Parley.
//!
//! This crate provides:
//! - [`EntityId`] - Opaque entity handles scoped to one world model
//! - [`ModelId`] - World-model identity used to detect foreign entities
//! - [`Arguments`] - Immutable keyword to entity-sequence bindings
//! - [`Mood`] - The grammatical mood of a parsed utterance
//! - [`Error`] - Rich error types with context and a flat [`ProcessorCode`]
//! - Persistent collections ([`SharedVec`], [`SharedMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arguments;
pub mod collections;
pub mod entity;
pub mod error;
pub mod mood;

pub use arguments::Arguments;
pub use collections::{SharedMap, SharedVec};
pub use entity::{EntityId, ModelId};
pub use error::{Error, ErrorCategory, ErrorContext, ErrorKind, LifecycleViolation, ProcessorCode, Result};
pub use mood::Mood;

//! World model storage for Parley.
//!
//! This crate provides:
//! - [`EntityStore`] - Sequential entity allocation scoped to one model
//! - [`Fact`] - An asserted predicate or relation instance
//! - [`WorldModel`] - Entities, string values, facts, and the refresh-pending flag

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod fact;
pub mod world;

pub use entity::EntityStore;
pub use fact::Fact;
pub use world::WorldModel;

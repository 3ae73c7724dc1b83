//! Cross-layer integration tests for Parley
//!
//! Whole conversations: parsing, dispatch to plugins, and the world model.

mod moods;
mod plugins;
mod session;
mod snapshots;

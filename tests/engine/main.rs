//! Integration tests for the language engine
//!
//! Tests for the engine bracket, grammar compilation across plugins, and
//! parsing against a live shell world.

mod grammar;
mod pattern;

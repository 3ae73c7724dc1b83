//! Integration tests for Layer 2: Plugins and dispatch
//!
//! Tests handler resolution across registered plugins, keyword subset
//! matching, and handler invocation through the type-erased host.

mod invocation;
mod probe;
mod resolution;

//! Integration tests for Layer 0: Foundation
//!
//! Tests for entity handles, argument matching, moods, and the error taxonomy.

mod arguments;
mod errors;

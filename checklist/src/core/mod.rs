//! Deterministic, pure logic for the checklist core.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! collections and return deterministic outputs suitable for tests.

pub mod invariants;
pub mod list;
pub mod types;

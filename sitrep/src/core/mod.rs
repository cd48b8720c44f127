//! Deterministic, pure logic shared by the gatherers.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod envelope;
pub mod stack;
pub mod time;
pub mod types;

//! Deterministic, pure logic of the review pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod decision;
pub mod metadata;
pub mod types;
pub mod verdict;

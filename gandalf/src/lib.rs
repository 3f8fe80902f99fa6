//! Commit-gate diff reviewer backed by a local LLM.
//!
//! A unified diff is read from stdin, summarized, sent to an external
//! inference engine for a structured risk assessment, and mapped to an
//! ALLOW/WARN/BLOCK decision. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (metadata extraction, verdict
//!   validation, decisions). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting stages (bounded input, prompt rendering,
//!   engine subprocess supervision, config files).
//!
//! [`review`] wires the stages into the pipeline; [`report`] renders its outcome.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
pub mod review;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

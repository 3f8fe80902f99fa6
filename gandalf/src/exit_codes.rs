//! Stable exit codes for the gandalf CLI.
//!
//! Callers only distinguish "safe to proceed" from "do not silently proceed";
//! detail is conveyed in the printed report.

/// ALLOW or WARN, nothing to review, or a binary-only diff.
pub const OK: i32 = 0;
/// BLOCK decision.
pub const BLOCKED: i32 = 1;
/// Any ingestion, invocation, validation, or configuration failure.
pub const FAILED: i32 = 1;

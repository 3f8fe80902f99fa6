//! Side-effecting stages of the review pipeline.

pub mod config;
pub mod engine;
pub mod input;
pub mod process;
pub mod prompt;

//! Typed failures of the review pipeline.
//!
//! Every variant is terminal for the current run. The CLI reports the message
//! on stderr and exits with [`crate::exit_codes::FAILED`].

use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    /// The normalized diff grew past the configured input cap.
    #[error("diff exceeds the {limit} byte input limit")]
    IngestionTooLarge { limit: usize },

    #[error("failed to read diff from input")]
    IngestionStream(#[source] io::Error),

    /// The engine executable is missing or not executable.
    #[error("inference engine `{program}` is not available (is it installed and on PATH?)")]
    ToolUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to run inference engine `{program}`: {context}")]
    Spawn {
        program: String,
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("inference engine timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("inference engine exited with status {}: {}", display_code(.code), .stderr.trim())]
    EngineFailure { code: Option<i32>, stderr: String },

    #[error("no JSON object found in inference engine output")]
    NoJsonFound,

    #[error("inference engine output violates the review schema: {0}")]
    SchemaViolation(String),

    /// The validator accepted something the typed model cannot represent.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

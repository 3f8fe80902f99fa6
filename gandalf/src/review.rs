//! The diff-review pipeline.
//!
//! Reader → extractor → prompt builder → engine → validator → decision, run
//! strictly in sequence for a single diff.

use std::collections::BTreeSet;
use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::core::decision::decide;
use crate::core::metadata::extract_metadata;
use crate::core::types::{Decision, DiffMetadata};
use crate::core::verdict::parse_verdict;
use crate::error::ReviewError;
use crate::exit_codes;
use crate::io::engine::InferenceEngine;
use crate::io::input::read_diff;
use crate::io::prompt::build_prompt;

/// Successful terminal state of one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Input was empty or whitespace only.
    NoChanges,
    /// Every changed file is binary; the engine was not consulted.
    BinaryOnly { files: BTreeSet<String> },
    Reviewed {
        metadata: DiffMetadata,
        decision: Decision,
    },
}

impl ReviewOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            ReviewOutcome::Reviewed { decision, .. } if !decision.action.permits_commit() => {
                exit_codes::BLOCKED
            }
            _ => exit_codes::OK,
        }
    }
}

/// Review the diff read from `input` with `engine`.
///
/// `max_input_bytes` caps the normalized diff size. The engine is invoked at
/// most once, and only when there is reviewable text.
#[instrument(skip_all, fields(max_input_bytes = max_input_bytes))]
pub fn run_review<R: BufRead, E: InferenceEngine>(
    input: R,
    engine: &E,
    max_input_bytes: usize,
) -> Result<ReviewOutcome, ReviewError> {
    let diff = read_diff(input, max_input_bytes)?;
    if diff.trim().is_empty() {
        info!("no changes to review");
        return Ok(ReviewOutcome::NoChanges);
    }

    let metadata = extract_metadata(&diff);
    debug!(
        files_changed = metadata.files_changed,
        lines_added = metadata.lines_added,
        lines_removed = metadata.lines_removed,
        "extracted diff metadata"
    );
    if metadata.is_binary_only() {
        info!(files = metadata.files_changed, "binary-only diff, skipping review");
        return Ok(ReviewOutcome::BinaryOnly {
            files: metadata.binary_files,
        });
    }

    let prompt = build_prompt(&metadata, &diff);
    let raw = engine.infer(&prompt)?;
    let verdict = parse_verdict(&raw)?;
    let decision = decide(verdict);
    info!(
        risk = decision.risk.as_str(),
        action = decision.action.as_str(),
        "review decided"
    );

    Ok(ReviewOutcome::Reviewed { metadata, decision })
}

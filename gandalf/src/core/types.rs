//! Shared deterministic types for the review pipeline.
//!
//! These types define stable contracts between pipeline stages. They carry no
//! I/O handles and serialize the same way on every run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Structural summary of a unified diff.
///
/// Built once per run by [`crate::core::metadata::extract_metadata`], which
/// upholds `files_changed == files.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffMetadata {
    pub files_changed: usize,
    pub files: BTreeSet<String>,
    pub binary_files: BTreeSet<String>,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DiffMetadata {
    /// True when every changed file is binary, so there is no text to review.
    pub fn is_binary_only(&self) -> bool {
        !self.files.is_empty() && self.files == self.binary_files
    }
}

/// Engine-assessed danger of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Validated engine output. Only [`crate::core::verdict::parse_verdict`] produces these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewVerdict {
    pub risk: RiskLevel,
    pub issues: Vec<String>,
    pub summary: String,
}

/// Gate action derived from a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Allow,
    Warn,
    Block,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Allow => "ALLOW",
            Action::Warn => "WARN",
            Action::Block => "BLOCK",
        }
    }

    /// Whether the caller may proceed with the commit.
    pub fn permits_commit(self) -> bool {
        !matches!(self, Action::Block)
    }
}

/// Final gate decision. Carries the verdict's risk, summary and issues unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub risk: RiskLevel,
    pub summary: String,
    pub issues: Vec<String>,
}

//! Rendering review outcomes for the terminal or for machines.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::review::ReviewOutcome;

const BANNER: &str = "Git Gandalf Review";

/// Human-readable report.
pub fn render_text(outcome: &ReviewOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{BANNER}");
    match outcome {
        ReviewOutcome::NoChanges => {
            let _ = writeln!(out, "No changes detected, nothing to review.");
        }
        ReviewOutcome::BinaryOnly { files } => {
            let names: Vec<&str> = files.iter().map(String::as_str).collect();
            let _ = writeln!(
                out,
                "Only binary files changed ({}), skipping review.",
                names.join(", ")
            );
        }
        ReviewOutcome::Reviewed { metadata, decision } => {
            let _ = writeln!(
                out,
                "{} file(s), +{} -{}",
                metadata.files_changed, metadata.lines_added, metadata.lines_removed
            );
            let _ = writeln!(out, "Risk:    {}", decision.risk.as_str());
            let _ = writeln!(out, "Action:  {}", decision.action.as_str());
            let _ = writeln!(out, "Summary: {}", decision.summary);
            if decision.issues.is_empty() {
                let _ = writeln!(out, "Issues:  none");
            } else {
                let _ = writeln!(out, "Issues:");
                for issue in &decision.issues {
                    let _ = writeln!(out, "  - {issue}");
                }
            }
        }
    }
    out
}

/// Pretty-printed JSON report with a trailing newline.
pub fn render_json(outcome: &ReviewOutcome) -> Result<String> {
    let mut payload = serde_json::to_string_pretty(outcome).context("serialize review report")?;
    payload.push('\n');
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::extract_metadata;
    use crate::core::types::{Action, Decision, RiskLevel};
    use crate::test_support::{BINARY_ONLY_DIFF, TEXT_DIFF};

    fn reviewed(issues: Vec<String>) -> ReviewOutcome {
        ReviewOutcome::Reviewed {
            metadata: extract_metadata(TEXT_DIFF),
            decision: Decision {
                action: Action::Block,
                risk: RiskLevel::High,
                summary: "adds raw query".to_string(),
                issues,
            },
        }
    }

    #[test]
    fn text_report_lists_issues() {
        let text = render_text(&reviewed(vec!["sql injection".to_string()]));
        assert_eq!(
            text,
            "Git Gandalf Review\n\
             2 file(s), +3 -1\n\
             Risk:    HIGH\n\
             Action:  BLOCK\n\
             Summary: adds raw query\n\
             Issues:\n  - sql injection\n"
        );
    }

    #[test]
    fn text_report_for_no_issues() {
        let text = render_text(&reviewed(Vec::new()));
        assert!(text.ends_with("Issues:  none\n"));
    }

    #[test]
    fn text_report_for_short_circuits() {
        assert!(render_text(&ReviewOutcome::NoChanges).contains("nothing to review"));
        let meta = extract_metadata(BINARY_ONLY_DIFF);
        let text = render_text(&ReviewOutcome::BinaryOnly {
            files: meta.binary_files,
        });
        assert!(text.contains("Only binary files changed (assets/logo.png)"));
    }

    #[test]
    fn json_report_is_tagged() {
        let json = render_json(&reviewed(vec!["sql injection".to_string()])).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["status"], "reviewed");
        assert_eq!(value["decision"]["action"], "BLOCK");
        assert_eq!(value["decision"]["risk"], "HIGH");
        assert_eq!(value["metadata"]["files_changed"], 2);

        let json = render_json(&ReviewOutcome::NoChanges).expect("json");
        assert_eq!(json, "{\n  \"status\": \"no_changes\"\n}\n");
    }
}

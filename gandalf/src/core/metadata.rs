//! Line-oriented extraction of diff metadata.
//!
//! Malformed input never fails; it simply yields emptier metadata.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::types::DiffMetadata;

static DIFF_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^diff --git a/(.+) b/(.+)$").unwrap());
static BINARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Binary files (.+) and (.+) differ$").unwrap());

/// Summarize a normalized (`\n`-terminated) unified diff in a single pass.
pub fn extract_metadata(diff: &str) -> DiffMetadata {
    let mut files = BTreeSet::new();
    let mut binary_files = BTreeSet::new();
    let mut lines_added = 0usize;
    let mut lines_removed = 0usize;

    for line in diff.split('\n') {
        if line.starts_with("diff --git ") {
            if let Some(caps) = DIFF_HEADER_RE.captures(line) {
                files.insert(caps[2].to_string());
            }
            continue;
        }

        if line.starts_with("Binary files ") {
            if let Some(path) = BINARY_RE
                .captures(line)
                .and_then(|caps| caps[2].strip_prefix("b/").map(str::to_string))
            {
                files.insert(path.clone());
                binary_files.insert(path);
            }
            continue;
        }

        if line.starts_with('+') && !line.starts_with("+++") {
            lines_added += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            lines_removed += 1;
        }
    }

    DiffMetadata {
        files_changed: files.len(),
        files,
        binary_files,
        lines_added,
        lines_removed,
    }
}

//! Review prompt rendering.

use minijinja::{Environment, context};

use crate::core::types::DiffMetadata;

const REVIEW_TEMPLATE: &str = include_str!("prompts/review.md");

/// Template engine wrapper around minijinja.
struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("review", REVIEW_TEMPLATE)
            .expect("review template should be valid");
        Self { env }
    }

    fn render_review(&self, metadata: &str, diff: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("review")?
            .render(context! { metadata => metadata, diff => diff })
    }
}

/// Render the canonical metadata block embedded in the prompt.
pub fn render_metadata(metadata: &DiffMetadata) -> String {
    serde_json::to_string_pretty(metadata).expect("diff metadata serializes to JSON")
}

/// Build the engine prompt for `diff`. Deterministic for a given input.
pub fn build_prompt(metadata: &DiffMetadata, diff: &str) -> String {
    PromptEngine::new()
        .render_review(&render_metadata(metadata), diff.trim_end())
        .expect("review template rendering should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::extract_metadata;
    use crate::test_support::TEXT_DIFF;

    #[test]
    fn prompt_embeds_metadata_and_diff() {
        let metadata = extract_metadata(TEXT_DIFF);
        let prompt = build_prompt(&metadata, TEXT_DIFF);
        assert!(prompt.contains("\"files_changed\": 2"));
        assert!(prompt.contains("\"lines_added\": 3"));
        assert!(prompt.contains("diff --git a/src/db.rs b/src/db.rs"));
        assert!(prompt.contains(r#"{ "risk": "LOW|MEDIUM|HIGH", "issues": ["..."], "summary": "..." }"#));
    }

    #[test]
    fn prompt_is_deterministic() {
        let metadata = extract_metadata(TEXT_DIFF);
        assert_eq!(
            build_prompt(&metadata, TEXT_DIFF),
            build_prompt(&metadata, TEXT_DIFF)
        );
    }

    /// Diff text is inserted verbatim, without HTML escaping.
    #[test]
    fn diff_is_not_escaped() {
        let diff = "+if a < b && c > d { \"x\" }\n";
        let prompt = build_prompt(&extract_metadata(diff), diff);
        assert!(prompt.contains("+if a < b && c > d { \"x\" }"));
    }
}

//! Validation of raw inference engine output.
//!
//! Two steps with distinct failures: locate a JSON object in free text
//! ([`ReviewError::NoJsonFound`]), then decode it strictly against the closed
//! review schema ([`ReviewError::SchemaViolation`]).

use jsonschema::Draft;
use serde_json::Value;

use crate::core::types::ReviewVerdict;
use crate::error::ReviewError;

pub const VERDICT_SCHEMA: &str = include_str!("../../schemas/review_verdict.schema.json");

const ALLOWED_KEYS: [&str; 3] = ["risk", "issues", "summary"];

/// Return the span from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(raw: &str) -> Result<&str, ReviewError> {
    let start = raw.find('{').ok_or(ReviewError::NoJsonFound)?;
    let end = raw.rfind('}').ok_or(ReviewError::NoJsonFound)?;
    if end < start {
        return Err(ReviewError::NoJsonFound);
    }
    Ok(&raw[start..=end])
}

/// Extract and strictly validate a [`ReviewVerdict`] from engine output.
pub fn parse_verdict(raw: &str) -> Result<ReviewVerdict, ReviewError> {
    let candidate = extract_json_object(raw)?;
    let value: Value = serde_json::from_str(candidate)
        .map_err(|err| ReviewError::SchemaViolation(format!("invalid JSON: {err}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| ReviewError::SchemaViolation("expected a JSON object".to_string()))?;
    let unexpected: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !ALLOWED_KEYS.contains(key))
        .collect();
    if !unexpected.is_empty() {
        return Err(ReviewError::SchemaViolation(format!(
            "unexpected field(s): {}",
            unexpected.join(", ")
        )));
    }

    validate_schema(&value)?;

    serde_json::from_value(value).map_err(|err| {
        ReviewError::InternalConsistency(format!(
            "schema-valid verdict failed to decode: {err}"
        ))
    })
}

/// Validate against the review schema (Draft 2020-12).
fn validate_schema(instance: &Value) -> Result<(), ReviewError> {
    let schema: Value = serde_json::from_str(VERDICT_SCHEMA).map_err(|err| {
        ReviewError::InternalConsistency(format!("parse verdict schema: {err}"))
    })?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| ReviewError::InternalConsistency(format!("compile verdict schema: {err}")))?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(ReviewError::SchemaViolation(messages.join("; ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RiskLevel;

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let raw = r#"Here you go: {"risk":"LOW","issues":[],"summary":"ok"} hope that helps"#;
        assert_eq!(
            extract_json_object(raw).expect("object"),
            r#"{"risk":"LOW","issues":[],"summary":"ok"}"#
        );
    }

    #[test]
    fn missing_braces_is_no_json() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(ReviewError::NoJsonFound)
        ));
        assert!(matches!(
            extract_json_object("} backwards {"),
            Err(ReviewError::NoJsonFound)
        ));
    }

    #[test]
    fn decodes_verdict_embedded_in_prose() {
        let raw = "Review complete.\n```json\n\
                   {\"risk\":\"HIGH\",\"issues\":[\"sql injection\"],\"summary\":\"adds raw query\"}\n\
                   ```\nLet me know if you need more.";
        let verdict = parse_verdict(raw).expect("valid verdict");
        assert_eq!(
            verdict,
            ReviewVerdict {
                risk: RiskLevel::High,
                issues: vec!["sql injection".to_string()],
                summary: "adds raw query".to_string(),
            }
        );
    }

    #[test]
    fn empty_issues_are_allowed() {
        let verdict = parse_verdict(r#"{"risk":"MEDIUM","issues":[],"summary":"touches config"}"#)
            .expect("valid verdict");
        assert_eq!(verdict.risk, RiskLevel::Medium);
        assert!(verdict.issues.is_empty());
    }

    #[test]
    fn extra_key_is_rejected_by_name() {
        let raw = r#"{"risk":"HIGH","issues":[],"summary":"x","confidence":0.9}"#;
        match parse_verdict(raw) {
            Err(ReviewError::SchemaViolation(msg)) => assert!(msg.contains("confidence"), "{msg}"),
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = r#"{"risk":"LOW","summary":"no issues key"}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(ReviewError::SchemaViolation(_))
        ));
    }

    /// Risk levels are case-sensitive and have no synonyms.
    #[test]
    fn unknown_risk_values_are_rejected() {
        for risk in ["low", "CRITICAL", "SEVERE", ""] {
            let raw = format!(r#"{{"risk":"{risk}","issues":[],"summary":"x"}}"#);
            assert!(
                matches!(parse_verdict(&raw), Err(ReviewError::SchemaViolation(_))),
                "risk {risk:?} should be rejected"
            );
        }
    }

    #[test]
    fn non_string_issue_is_rejected() {
        let raw = r#"{"risk":"LOW","issues":["ok", 3],"summary":"x"}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(ReviewError::SchemaViolation(_))
        ));
    }

    #[test]
    fn empty_summary_is_rejected() {
        let raw = r#"{"risk":"LOW","issues":[],"summary":""}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(ReviewError::SchemaViolation(_))
        ));
    }

    #[test]
    fn malformed_json_is_schema_violation() {
        let raw = r#"{"risk": "LOW", "issues": [}"#;
        assert!(matches!(
            parse_verdict(raw),
            Err(ReviewError::SchemaViolation(_))
        ));
    }

    #[test]
    fn embedded_schema_is_valid_json() {
        let schema: Value = serde_json::from_str(VERDICT_SCHEMA).expect("schema json");
        assert_eq!(schema["additionalProperties"], Value::Bool(false));
    }
}

//! Record extractor — pulls the structured payload out of model prose.
//!
//! The system prompt instructs the model to embed a JSON object with a
//! `complete` flag once it believes it has gathered everything. Models wrap
//! that object in prose, markdown fences, or nested examples, so this module
//! scans for balanced `{...}` spans instead of parsing the whole turn.

use crate::contract::ContractDraft;
use serde_json::Value;
use tracing::{debug, trace};

/// A structured record found in an assistant turn.
#[derive(Debug, Clone)]
pub struct ExtractedRecord {
    /// Whether the model flagged the record as complete.
    pub complete: bool,

    /// The draft built from the record's fields.
    pub draft: ContractDraft,
}

/// Scan `text` for an embedded contract record.
///
/// Two passes: first, every balanced object whose raw text mentions
/// `complete` is parsed, and the first one carrying a truthy `complete`
/// flag wins. Failing that, the outermost `{...}` span is tried as a
/// partial record. Returns `None` when the turn holds no parseable object.
pub fn extract_record(text: &str) -> Option<ExtractedRecord> {
    for span in balanced_objects(text) {
        if !span.contains("complete") {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(span) else {
            trace!("balanced span failed to parse, continuing scan");
            continue;
        };
        if let Some(obj) = value.as_object()
            && obj.get("complete").is_some_and(is_truthy)
        {
            debug!("found complete record in assistant turn");
            return Some(ExtractedRecord {
                complete: true,
                draft: ContractDraft::from_value(&value),
            });
        }
    }

    // Fallback: the widest brace span, taken as an in-progress record.
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let value = serde_json::from_str::<Value>(&text[start..=end]).ok()?;
    value.as_object()?;
    Some(ExtractedRecord {
        complete: value.get("complete").is_some_and(is_truthy),
        draft: ContractDraft::from_value(&value),
    })
}

/// Truthiness matching what models actually emit: `true`, a nonzero
/// number, or a non-empty string.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => false,
    }
}

/// All balanced top-level `{...}` spans in `text`, in order of appearance.
///
/// Tracks JSON string state so braces inside quoted values don't confuse
/// the depth counter.
fn balanced_objects(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(&text[start..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractVersion;

    #[test]
    fn extracts_complete_record_from_prose() {
        let text = r#"Great, I have everything I need!

{"complete": true, "contract_version": "A", "full_name": "Jane Doe", "workload_percentage": 80}

Let me put that together for review."#;
        let record = extract_record(text).unwrap();
        assert!(record.complete);
        assert_eq!(record.draft.contract_version, Some(ContractVersion::A));
        assert_eq!(record.draft.workload_percentage, Some(80.0));
    }

    #[test]
    fn extracts_from_markdown_fence() {
        let text = "Here is the record:\n```json\n{\"complete\": true, \"full_name\": \"Jane Doe\"}\n```";
        let record = extract_record(text).unwrap();
        assert!(record.complete);
        assert_eq!(record.draft.full_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn braces_inside_strings_do_not_break_scanning() {
        let text = r#"{"complete": true, "job_title": "Engineer {level 2}", "full_name": "Jane"}"#;
        let record = extract_record(text).unwrap();
        assert!(record.complete);
        assert_eq!(record.draft.job_title.as_deref(), Some("Engineer {level 2}"));
    }

    #[test]
    fn skips_incomplete_objects_in_favor_of_complete_one() {
        let text = r#"An example looks like {"complete": false, "full_name": "Example"}.
Here is the real one: {"complete": true, "full_name": "Jane Doe"}"#;
        let record = extract_record(text).unwrap();
        assert!(record.complete);
        assert_eq!(record.draft.full_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn truthy_complete_variants() {
        for flag in [r#"true"#, r#"1"#, r#""yes""#] {
            let text = format!(r#"{{"complete": {flag}, "full_name": "Jane"}}"#);
            let record = extract_record(&text).unwrap();
            assert!(record.complete, "flag {flag} should be truthy");
        }
        for flag in [r#"false"#, r#"0"#, r#""""#, r#"null"#] {
            let text = format!(r#"{{"complete": {flag}, "full_name": "Jane"}}"#);
            let record = extract_record(&text).unwrap();
            assert!(!record.complete, "flag {flag} should not be truthy");
        }
    }

    #[test]
    fn fallback_accepts_record_without_complete_flag() {
        let text = r#"So far: {"full_name": "Jane Doe", "gender": "female"}"#;
        let record = extract_record(text).unwrap();
        assert!(!record.complete);
        assert_eq!(record.draft.gender.as_deref(), Some("female"));
    }

    #[test]
    fn plain_prose_yields_nothing() {
        assert!(extract_record("What is the employee's start date?").is_none());
    }

    #[test]
    fn unbalanced_braces_yield_nothing() {
        assert!(extract_record(r#"{"full_name": "Jane"#).is_none());
    }

    #[test]
    fn numbers_as_strings_are_accepted() {
        let text = r#"{"complete": true, "contract_version": "C", "hourly_salary": "45.50"}"#;
        let record = extract_record(text).unwrap();
        assert_eq!(record.draft.hourly_salary, Some(45.50));
    }
}

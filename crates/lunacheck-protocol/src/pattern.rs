//! Structural subset matching for response and status payloads
//!
//! Scenario expectations are written as JSON templates that name only the
//! fields under test. A template matches a payload when every field it names
//! is present and matches; extra fields in the payload are ignored. Array
//! templates use unordered containment: each template element must match at
//! least one payload element, which is what lets an expectation pin down one
//! sink's row in a `video` array without spelling out the others.
//!
//! The string `"_any_"` matches any present value, so an expectation can
//! require a field to exist without fixing its value.

use serde_json::Value;
use std::fmt;

/// Wildcard token: matches any value as long as the field is present
pub const ANY_TOKEN: &str = "_any_";

/// A structural template over JSON payloads
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    template: Value,
}

/// Where and why a payload failed to match
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Path into the template, `$.video[0].sink` style
    pub path: String,
    /// Human-readable reason
    pub reason: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.path, self.reason)
    }
}

impl Pattern {
    /// Build a pattern from a JSON template
    pub fn new(template: Value) -> Self {
        Self { template }
    }

    /// The empty-object pattern: matches any object payload
    pub fn any_update() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }

    /// The underlying template
    pub fn template(&self) -> &Value {
        &self.template
    }

    /// Whether `candidate` satisfies the template
    pub fn matches(&self, candidate: &Value) -> bool {
        self.mismatch(candidate).is_none()
    }

    /// First mismatch between template and `candidate`, if any
    pub fn mismatch(&self, candidate: &Value) -> Option<Mismatch> {
        check(&self.template, candidate, "$")
    }
}

impl From<Value> for Pattern {
    fn from(template: Value) -> Self {
        Pattern::new(template)
    }
}

fn check(template: &Value, candidate: &Value, path: &str) -> Option<Mismatch> {
    match template {
        Value::String(token) if token == ANY_TOKEN => None,
        Value::Object(fields) => {
            let Some(object) = candidate.as_object() else {
                return Some(Mismatch {
                    path: path.to_string(),
                    reason: format!("expected an object, got {}", candidate),
                });
            };
            for (key, sub_template) in fields {
                let sub_path = format!("{}.{}", path, key);
                match object.get(key) {
                    None => {
                        return Some(Mismatch {
                            path: sub_path,
                            reason: "missing field".to_string(),
                        });
                    }
                    Some(sub_candidate) => {
                        if let Some(mismatch) = check(sub_template, sub_candidate, &sub_path) {
                            return Some(mismatch);
                        }
                    }
                }
            }
            None
        }
        Value::Array(items) => {
            let Some(array) = candidate.as_array() else {
                return Some(Mismatch {
                    path: path.to_string(),
                    reason: format!("expected an array, got {}", candidate),
                });
            };
            for (index, sub_template) in items.iter().enumerate() {
                let sub_path = format!("{}[{}]", path, index);
                let found = array
                    .iter()
                    .any(|element| check(sub_template, element, &sub_path).is_none());
                if !found {
                    return Some(Mismatch {
                        path: sub_path,
                        reason: format!(
                            "no array element matches template {}",
                            sub_template
                        ),
                    });
                }
            }
            None
        }
        Value::Number(expected) => {
            // The wire mixes integer and float spellings of the same value.
            let matched = match (expected.as_f64(), candidate.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            if matched {
                None
            } else {
                Some(Mismatch {
                    path: path.to_string(),
                    reason: format!("expected {}, got {}", expected, candidate),
                })
            }
        }
        other => {
            if other == candidate {
                None
            } else {
                Some(Mismatch {
                    path: path.to_string(),
                    reason: format!("expected {}, got {}", other, candidate),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_subset_object_match() {
        let pattern = Pattern::new(json!({"returnValue": true}));
        assert!(pattern.matches(&json!({"returnValue": true, "planeID": 2})));
    }

    #[test]
    fn test_missing_field_mismatch() {
        let pattern = Pattern::new(json!({"muted": false}));
        let mismatch = pattern.mismatch(&json!({"sink": "MAIN"})).unwrap();
        assert_eq!(mismatch.path, "$.muted");
    }

    #[test]
    fn test_array_containment_picks_matching_row() {
        let pattern = Pattern::new(json!({
            "video": [{"sink": "SUB0", "muted": true}]
        }));
        let status = json!({
            "video": [
                {"sink": "MAIN", "muted": false},
                {"sink": "SUB0", "muted": true},
            ]
        });
        assert!(pattern.matches(&status));
    }

    #[test]
    fn test_array_containment_reports_unmatched_row() {
        let pattern = Pattern::new(json!({
            "video": [
                {"sink": "MAIN", "opacity": 130},
                {"sink": "SUB0", "opacity": 230},
            ]
        }));
        let status = json!({
            "video": [{"sink": "MAIN", "opacity": 130}]
        });
        let mismatch = pattern.mismatch(&status).unwrap();
        assert_eq!(mismatch.path, "$.video[1]");
    }

    #[test]
    fn test_wildcard_requires_presence() {
        let pattern = Pattern::new(json!({"context": "_any_"}));
        assert!(pattern.matches(&json!({"context": "pipeline1"})));
        assert!(pattern.matches(&json!({"context": null})));
        assert!(!pattern.matches(&json!({})));
    }

    #[test]
    fn test_null_template_requires_null() {
        let pattern = Pattern::new(json!({"connectedSource": null}));
        assert!(pattern.matches(&json!({"connectedSource": null})));
        assert!(!pattern.matches(&json!({"connectedSource": "HDMI"})));
    }

    #[rstest]
    #[case(json!(29.5), json!(29.5))]
    #[case(json!(0), json!(0.0))]
    #[case(json!(1920.0), json!(1920))]
    fn test_numeric_comparison_ignores_spelling(#[case] template: Value, #[case] candidate: Value) {
        assert!(Pattern::new(template).matches(&candidate));
    }

    #[test]
    fn test_numeric_mismatch() {
        let mismatch = Pattern::new(json!({"frameRate": 29.5}))
            .mismatch(&json!({"frameRate": 30}))
            .unwrap();
        assert_eq!(mismatch.path, "$.frameRate");
    }

    #[test]
    fn test_any_update_matches_any_object() {
        assert!(Pattern::any_update().matches(&json!({"video": []})));
        assert!(Pattern::any_update().matches(&json!({})));
    }

    #[test]
    fn test_nested_rect_mismatch_path() {
        let pattern = Pattern::new(json!({
            "video": [{
                "sink": "MAIN",
                "displayOutput": {"x": 400, "y": 400, "width": 1920, "height": 1080},
            }]
        }));
        let status = json!({
            "video": [{
                "sink": "MAIN",
                "displayOutput": {"x": 0, "y": 0, "width": 0, "height": 0},
            }]
        });
        // The row exists but its rect differs, so containment fails on row 0.
        let mismatch = pattern.mismatch(&status).unwrap();
        assert_eq!(mismatch.path, "$.video[0]");
    }
}

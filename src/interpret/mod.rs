//! Result interpreters, one per tool family.
//!
//! Each interpreter is a pure function from a decoded tool payload to a
//! summary the caller can print. Missing fields never abort a summary; they
//! are recorded as [`InterpretError`] warnings and only the recommendation
//! that depended on them is dropped.

pub mod build;
pub mod deploy;
pub mod errors;
pub mod list;

pub use build::{BuildSummary, ComplianceVerdict, RemediationProposal};
pub use deploy::DeploySummary;
pub use errors::InterpretError;
pub use list::ListSummary;

use serde_json::Value;

/// First non-empty string found at any of the JSON pointers, in order.
pub(crate) fn first_str(payload: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|p| payload.pointer(p))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// String array at a JSON pointer; non-string entries are skipped.
pub(crate) fn str_list(payload: &Value, pointer: &str) -> Vec<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_str_order_and_empty_skip() {
        let payload = json!({"a": "", "b": {"c": "nested"}, "d": "flat"});
        assert_eq!(
            first_str(&payload, &["/a", "/b/c", "/d"]),
            Some("nested".to_string())
        );
        assert_eq!(first_str(&payload, &["/missing"]), None);
    }

    #[test]
    fn test_str_list_skips_non_strings() {
        let payload = json!({"w": ["one", 2, "three"]});
        assert_eq!(str_list(&payload, "/w"), vec!["one", "three"]);
        assert!(str_list(&payload, "/nope").is_empty());
    }
}

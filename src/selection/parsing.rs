//! Response parsing for the Selection LLM call.
//!
//! Decision-table priority, no exception-ladder: try the outermost JSON
//! object first, then the outermost JSON array, then fail. Every selected
//! path is checked against `all_paths`; unknown paths are silently dropped
//! rather than rejecting the whole response.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SelectionError;

#[derive(Debug, Deserialize)]
struct SelectionObject {
    selected_paths: Vec<String>,
    #[serde(default)]
    path_explanations: BTreeMap<String, String>,
}

pub struct ParsedSelection {
    pub selected_paths: Vec<String>,
    pub path_reasoning: BTreeMap<String, String>,
    pub rejected_paths: Vec<String>,
}

pub fn parse_selection_response(raw: &str, all_paths: &[String]) -> Result<ParsedSelection, SelectionError> {
    let (candidate_paths, path_reasoning) = parse_object_form(raw)
        .or_else(|| parse_array_form(raw).map(|paths| (paths, BTreeMap::new())))
        .ok_or(SelectionError::UnparsableResponse)?;

    let mut selected_paths = Vec::new();
    let mut rejected_paths = Vec::new();
    for path in candidate_paths {
        if all_paths.contains(&path) {
            selected_paths.push(path);
        } else {
            rejected_paths.push(path);
        }
    }

    let path_reasoning = path_reasoning
        .into_iter()
        .filter(|(path, _)| selected_paths.contains(path))
        .collect();

    Ok(ParsedSelection {
        selected_paths,
        path_reasoning,
        rejected_paths,
    })
}

fn parse_object_form(raw: &str) -> Option<(Vec<String>, BTreeMap<String, String>)> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    let slice = &raw[start..=end];
    let parsed: SelectionObject = serde_json::from_str(slice).ok()?;
    Some((parsed.selected_paths, parsed.path_explanations))
}

fn parse_array_form(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    let slice = &raw[start..=end];
    let values: Vec<Value> = serde_json::from_str(slice).ok()?;
    values
        .into_iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_paths() -> Vec<String> {
        vec!["/about".to_string(), "/contact".to_string(), "/products".to_string()]
    }

    #[test]
    fn parses_object_form_with_explanations() {
        let raw = r#"Here is my answer: {"selected_paths": ["/about", "/contact"], "path_explanations": {"/about": "company info"}}"#;
        let parsed = parse_selection_response(raw, &all_paths()).unwrap();
        assert_eq!(parsed.selected_paths, vec!["/about".to_string(), "/contact".to_string()]);
        assert_eq!(parsed.path_reasoning.get("/about").unwrap(), "company info");
    }

    #[test]
    fn parses_legacy_bare_array() {
        let raw = r#"["/about", "/products"]"#;
        let parsed = parse_selection_response(raw, &all_paths()).unwrap();
        assert_eq!(parsed.selected_paths, vec!["/about".to_string(), "/products".to_string()]);
    }

    #[test]
    fn drops_unknown_paths_silently() {
        let raw = r#"{"selected_paths": ["/about", "/unknown-path"]}"#;
        let parsed = parse_selection_response(raw, &all_paths()).unwrap();
        assert_eq!(parsed.selected_paths, vec!["/about".to_string()]);
        assert_eq!(parsed.rejected_paths, vec!["/unknown-path".to_string()]);
    }

    #[test]
    fn fails_on_unparsable_response() {
        let raw = "I cannot help with that.";
        assert!(parse_selection_response(raw, &all_paths()).is_err());
    }
}

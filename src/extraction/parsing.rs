//! Response parsing for the Extraction LLM call.
//!
//! Locates the outermost `{ … }` substring, parses it as JSON, then applies
//! a small set of type coercions for fields the model is prone to emit as
//! strings.

use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::extraction::schema::{BOOLEAN_FIELDS, FLOAT_FIELDS, INTEGER_FIELDS};

pub fn parse_extraction_response(raw: &str, company_name_fallback: &str) -> Result<Map<String, Value>, ExtractionError> {
    let start = raw.find('{').ok_or(ExtractionError::UnparsableResponse)?;
    let end = raw.rfind('}').ok_or(ExtractionError::UnparsableResponse)?;
    if end < start {
        return Err(ExtractionError::UnparsableResponse);
    }

    let slice = &raw[start..=end];
    let Value::Object(mut fields) = serde_json::from_str(slice).map_err(|_| ExtractionError::UnparsableResponse)?
    else {
        return Err(ExtractionError::UnparsableResponse);
    };

    ensure_company_name(&mut fields, company_name_fallback);
    coerce_fields(&mut fields);

    Ok(fields)
}

fn ensure_company_name(fields: &mut Map<String, Value>, fallback: &str) {
    let has_name = fields
        .get("company_name")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if !has_name {
        fields.insert("company_name".to_string(), Value::String(fallback.to_string()));
    }
    let company_name = fields.get("company_name").cloned().unwrap_or(Value::Null);
    fields.insert("name".to_string(), company_name);
}

fn coerce_fields(fields: &mut Map<String, Value>) {
    for field in BOOLEAN_FIELDS {
        if let Some(Value::String(s)) = fields.get(*field) {
            if let Some(b) = coerce_bool(s) {
                fields.insert((*field).to_string(), Value::Bool(b));
            }
        }
    }

    for field in INTEGER_FIELDS {
        if let Some(Value::String(s)) = fields.get(*field) {
            if let Ok(i) = s.trim().parse::<i64>() {
                fields.insert((*field).to_string(), Value::from(i));
            }
        }
    }

    for field in FLOAT_FIELDS {
        if let Some(Value::String(s)) = fields.get(*field) {
            if let Ok(f) = s.trim().parse::<f64>() {
                if let Some(num) = serde_json::Number::from_f64(f) {
                    fields.insert((*field).to_string(), Value::Number(num));
                }
            }
        }
    }
}

fn coerce_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falls_back_to_input_company_name_when_missing() {
        let raw = r#"{"industry": "software"}"#;
        let fields = parse_extraction_response(raw, "Acme Corp").unwrap();
        assert_eq!(fields.get("company_name"), Some(&json!("Acme Corp")));
        assert_eq!(fields.get("name"), Some(&json!("Acme Corp")));
    }

    #[test]
    fn coerces_string_booleans() {
        let raw = r#"{"company_name": "Acme", "is_saas": "yes"}"#;
        let fields = parse_extraction_response(raw, "Acme").unwrap();
        assert_eq!(fields.get("is_saas"), Some(&json!(true)));
    }

    #[test]
    fn coerces_string_integers() {
        let raw = r#"{"company_name": "Acme", "founding_year": "1999"}"#;
        let fields = parse_extraction_response(raw, "Acme").unwrap();
        assert_eq!(fields.get("founding_year"), Some(&json!(1999)));
    }

    #[test]
    fn fails_when_no_object_present() {
        let raw = "not json at all";
        assert!(parse_extraction_response(raw, "Acme").is_err());
    }

    #[test]
    fn extracts_outermost_object_ignoring_surrounding_prose() {
        let raw = "Here you go: {\"company_name\": \"Acme\"} -- hope that helps";
        let fields = parse_extraction_response(raw, "fallback").unwrap();
        assert_eq!(fields.get("company_name"), Some(&json!("Acme")));
    }
}

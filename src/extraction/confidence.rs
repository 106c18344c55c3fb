//! Weighted confidence scoring, reproduced verbatim from the
//! original extraction module's field weight table (weights sum to 1.0).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

const WEIGHTS: &[(&str, f64)] = &[
    ("company_description", 0.15),
    ("value_proposition", 0.10),
    ("industry", 0.10),
    ("business_model", 0.08),
    ("target_market", 0.08),
    ("products_services_offered", 0.07),
    ("key_services", 0.06),
    ("company_stage", 0.05),
    ("tech_stack", 0.05),
    ("location", 0.04),
    ("founding_year", 0.04),
    ("employee_count_range", 0.04),
    ("contact_info", 0.03),
    ("social_media", 0.03),
    ("leadership_team", 0.03),
    ("competitive_advantages", 0.03),
    ("funding_status", 0.02),
];

/// A field "is present" if: a string of length > 3 (after trim), a
/// non-empty list/object, or a number > 0.
fn is_present(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().len() > 3,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f > 0.0),
        Value::Bool(_) | Value::Null => false,
    }
}

/// Computes `overall_confidence` and the per-field contribution map.
#[must_use]
pub fn score(fields: &Map<String, Value>) -> (f64, BTreeMap<String, f64>) {
    let mut per_field = BTreeMap::new();
    let mut total = 0.0;

    for (field, weight) in WEIGHTS {
        let present = fields.get(*field).is_some_and(is_present);
        let contribution = if present { *weight } else { 0.0 };
        per_field.insert((*field).to_string(), contribution);
        total += contribution;
    }

    (total, per_field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_fields_yields_full_confidence() {
        let mut fields = Map::new();
        for (field, _) in WEIGHTS {
            fields.insert((*field).to_string(), json!("a value long enough"));
        }
        let (confidence, _) = score(&fields);
        assert!((confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_fields_yields_zero_confidence() {
        let (confidence, per_field) = score(&Map::new());
        assert_eq!(confidence, 0.0);
        assert!(per_field.values().all(|v| *v == 0.0));
    }

    #[test]
    fn short_strings_do_not_count_as_present() {
        let mut fields = Map::new();
        fields.insert("industry".to_string(), json!("ab"));
        let (_, per_field) = score(&fields);
        assert_eq!(per_field["industry"], 0.0);
    }
}

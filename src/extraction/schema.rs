//! Flat extraction schema: every field the extraction prompt
//! asks the model for, at the root of one JSON object.

/// Fields coerced to boolean when the model emits a recognizable string
/// form (`"true"`/`"false"`/`"yes"`/`"no"`/`"1"`/`"0"`).
pub const BOOLEAN_FIELDS: &[&str] = &["is_saas", "has_job_listings", "has_chat_widget", "has_forms"];

/// Fields coerced to integer from a numeric string.
pub const INTEGER_FIELDS: &[&str] = &["founding_year", "job_listings_count", "field_extraction_tokens", "total_tokens"];

/// Fields coerced to float from a numeric string.
pub const FLOAT_FIELDS: &[&str] = &[
    "classification_confidence",
    "stage_confidence",
    "tech_confidence",
    "industry_confidence",
    "total_cost_usd",
    "field_extraction_duration_seconds",
];

/// The full flat field list the prompt requests, used to decide
/// which keys in the model's JSON belong at the schema root vs. the `extra`
/// sidecar.
pub const SCHEMA_FIELDS: &[&str] = &[
    "company_name",
    "name",
    "website",
    "company_description",
    "value_proposition",
    "industry",
    "location",
    "founding_year",
    "company_size",
    "employee_count_range",
    "business_model_type",
    "business_model",
    "saas_classification",
    "is_saas",
    "classification_confidence",
    "classification_justification",
    "products_services_offered",
    "key_services",
    "target_market",
    "pain_points",
    "competitive_advantages",
    "tech_stack",
    "company_stage",
    "funding_status",
    "funding_stage_detailed",
    "stage_confidence",
    "tech_sophistication",
    "tech_confidence",
    "industry_confidence",
    "geographic_scope",
    "sales_complexity",
    "key_decision_makers",
    "leadership_team",
    "decision_maker_type",
    "has_job_listings",
    "job_listings_count",
    "job_listings",
    "job_listings_details",
    "recent_news_events",
    "recent_news",
    "has_chat_widget",
    "has_forms",
    "social_media",
    "contact_info",
    "company_culture",
    "awards",
    "certifications",
    "partnerships",
    "ai_summary",
    "field_extraction_tokens",
    "total_tokens",
    "llm_model_used",
    "total_cost_usd",
    "field_extraction_duration_seconds",
    "field_extraction_timestamp",
];

//! Extraction phase: turns aggregated crawl text into one flat
//! JSON object matching the target field schema.

mod confidence;
mod parsing;
mod prompt;
mod schema;

use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::llm::{LlmClient, PriceTable};
use crate::prompts::PromptStore;
use crate::types::{BatchCrawlResult, ExtractionResult};

const EXTRACTION_MODEL: &str = "amazon/nova-pro-v1";
const SOURCE_ATTRIBUTION_CAP: usize = 3;

pub async fn extract(
    llm: &dyn LlmClient,
    prompts: &PromptStore,
    prices: &PriceTable,
    crawl_result: &BatchCrawlResult,
    company_name: &str,
    config: &PipelineConfig,
) -> ExtractionResult {
    let started = Instant::now();
    let capped_content = prompt::cap_content(&crawl_result.aggregated_content, config.extraction_content_cap);
    let prompt_sent = prompt::build_prompt(prompts, company_name, crawl_result.total_pages, &capped_content);

    let timeout = Duration::from_secs(config.extraction_timeout_secs);
    let response = llm.complete(&prompt_sent, EXTRACTION_MODEL, timeout).await;

    if !response.success {
        return ExtractionResult {
            success: false,
            error: response.error.or(Some("extraction LLM call failed".to_string())),
            elapsed_seconds: started.elapsed().as_secs_f64(),
            ..ExtractionResult::default()
        };
    }

    let mut fields = match parsing::parse_extraction_response(&response.content, company_name) {
        Ok(fields) => fields,
        Err(e) => {
            return ExtractionResult {
                success: false,
                error: Some(e.to_string()),
                elapsed_seconds: started.elapsed().as_secs_f64(),
                ..ExtractionResult::default()
            };
        }
    };

    let cost_usd = prices.cost_usd(EXTRACTION_MODEL, response.tokens_used);
    inject_operational_metadata(&mut fields, response.tokens_used.total(), cost_usd, started.elapsed().as_secs_f64());

    let (overall_confidence, field_confidence_scores) = confidence::score(&fields);
    let source_attribution = attribute_sources(&fields, crawl_result);

    ExtractionResult {
        success: true,
        extracted_fields: fields,
        field_confidence_scores,
        overall_confidence,
        source_attribution,
        tokens_used: response.tokens_used,
        cost_usd,
        model_used: EXTRACTION_MODEL.to_string(),
        elapsed_seconds: started.elapsed().as_secs_f64(),
        error: None,
    }
}

fn inject_operational_metadata(fields: &mut serde_json::Map<String, Value>, tokens_used: u32, cost_usd: f64, elapsed_seconds: f64) {
    fields.insert("field_extraction_tokens".to_string(), Value::from(tokens_used));
    fields.insert("total_tokens".to_string(), Value::from(tokens_used));
    fields.insert("llm_model_used".to_string(), Value::String(EXTRACTION_MODEL.to_string()));
    fields.insert("total_cost_usd".to_string(), serde_json::json!(cost_usd));
    fields.insert("field_extraction_duration_seconds".to_string(), serde_json::json!(elapsed_seconds));
    fields.insert(
        "field_extraction_timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
}

/// Best-effort provenance: every populated field points at the top-3
/// successfully-crawled URLs. There's no per-field provenance, only a
/// provisional source list.
fn attribute_sources(
    fields: &serde_json::Map<String, Value>,
    crawl_result: &BatchCrawlResult,
) -> std::collections::BTreeMap<String, Vec<String>> {
    let mut successful_urls: Vec<String> = crawl_result
        .page_results
        .iter()
        .filter(|p| p.success)
        .map(|p| p.url.clone())
        .collect();
    successful_urls.sort();
    successful_urls.truncate(SOURCE_ATTRIBUTION_CAP);

    fields
        .iter()
        .filter(|(_, value)| !matches!(value, Value::Null))
        .map(|(field, _)| (field.clone(), successful_urls.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractionMethod, PageCrawlResult};

    fn crawl_with_pages(urls: &[&str]) -> BatchCrawlResult {
        BatchCrawlResult {
            page_results: urls
                .iter()
                .map(|u| PageCrawlResult {
                    url: (*u).to_string(),
                    success: true,
                    content: "content".to_string(),
                    title: None,
                    content_length: 7,
                    elapsed_seconds: 0.1,
                    extraction_method: ExtractionMethod::Primary,
                    error: None,
                })
                .collect(),
            ..BatchCrawlResult::default()
        }
    }

    #[test]
    fn source_attribution_caps_at_three_urls() {
        let crawl = crawl_with_pages(&["https://x.com/a", "https://x.com/b", "https://x.com/c", "https://x.com/d"]);
        let mut fields = serde_json::Map::new();
        fields.insert("industry".to_string(), serde_json::json!("software"));
        let attribution = attribute_sources(&fields, &crawl);
        assert_eq!(attribution["industry"].len(), 3);
    }
}

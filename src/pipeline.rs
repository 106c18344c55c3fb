//! Per-company pipeline adapter: glues the four phases for one
//! company, maps outputs onto `CompanyRecord`, accumulates cost/token
//! metrics, reports progress.

use std::sync::Arc;

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::crawling;
use crate::discovery;
use crate::extraction;
use crate::http_client::HttpFetcher;
use crate::llm::{LlmClient, PriceTable};
use crate::locale::extract_locale;
use crate::progress::{PhaseStatus, ProgressSink};
use crate::prompts::PromptStore;
use crate::selection;
use crate::types::{CompanyInput, CompanyRecord, LlmCallRecord, PhaseName};
use crate::PipelineError;

const NO_CONTENT_ERROR: &str = "No content extracted from pages";

pub struct PipelineInstance {
    pub fetcher: Arc<dyn HttpFetcher>,
    pub llm: Arc<dyn LlmClient>,
    pub prompts: PromptStore,
    pub prices: PriceTable,
}

/// Rejects malformed input before any phase runs: a bad URL or empty name
/// is recorded as a failed company synchronously, without starting phases.
fn validate_input(input: &CompanyInput) -> Result<(), PipelineError> {
    if input.name.trim().is_empty() {
        return Err(PipelineError::EmptyCompanyName);
    }
    url::Url::parse(&input.homepage_url).map_err(|_| PipelineError::InvalidHomepageUrl(input.homepage_url.clone()))?;
    Ok(())
}

/// Runs the full Discovery -> Selection -> Crawling -> Extraction sequence
/// for one company, returning a `CompanyRecord` in a terminal state
/// (`Success` or `Failed`) — never panics or propagates an error.
pub async fn run(
    instance: &PipelineInstance,
    input: &CompanyInput,
    config: &PipelineConfig,
    progress: &ProgressSink,
) -> CompanyRecord {
    let mut record = CompanyRecord::pending(input);

    if let Err(e) = validate_input(input) {
        record.mark_failed(e.to_string());
        return record;
    }

    record.mark_in_progress();
    let job_id = record.id.clone();

    let locale = extract_locale(&input.homepage_url);

    progress.report(&job_id, PhaseName::Discovery, PhaseStatus::Started, None).await;
    let mut discovery_result = discovery::discover(instance.fetcher.as_ref(), &input.homepage_url, config).await;
    if discovery_result.all_paths.is_empty() {
        discovery_result.all_paths = selection::fallback_paths(locale.as_deref());
        discovery_result
            .warnings
            .push("discovery returned no paths; substituted fallback path list".to_string());
    }
    progress.report(&job_id, PhaseName::Discovery, PhaseStatus::Completed, None).await;

    let domain = url::Url::parse(&discovery_result.canonical_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| input.homepage_url.clone());

    progress.report(&job_id, PhaseName::Selection, PhaseStatus::Started, None).await;
    let selection_result = selection::select(
        instance.llm.as_ref(),
        &instance.prompts,
        &instance.prices,
        &discovery_result.all_paths,
        &domain,
        locale.as_deref(),
        config,
    )
    .await;
    progress.report(&job_id, PhaseName::Selection, PhaseStatus::Completed, None).await;

    if selection_result.model_used != "fallback" {
        record.record_llm_call(LlmCallRecord {
            phase: PhaseName::Selection,
            model: selection_result.model_used.clone(),
            input_tokens: selection_result.tokens_used.prompt,
            output_tokens: selection_result.tokens_used.completion,
            cost_usd: selection_result.cost_usd,
            elapsed_seconds: selection_result.elapsed_seconds,
            timestamp: Utc::now(),
        });
    }

    progress.report(&job_id, PhaseName::Crawling, PhaseStatus::Started, None).await;
    let crawl_result = crawling::crawl(
        Arc::clone(&instance.fetcher),
        &discovery_result.canonical_url,
        &selection_result.selected_paths,
        config,
    )
    .await;
    progress.report(&job_id, PhaseName::Crawling, PhaseStatus::Completed, None).await;

    if crawl_result.aggregated_content.is_empty() {
        record.mark_failed(NO_CONTENT_ERROR);
        record.scrape_duration_seconds = (Utc::now() - record.created_at).num_milliseconds() as f64 / 1000.0;
        return record;
    }

    progress.report(&job_id, PhaseName::Extraction, PhaseStatus::Started, None).await;
    let extraction_result = extraction::extract(
        instance.llm.as_ref(),
        &instance.prompts,
        &instance.prices,
        &crawl_result,
        &input.name,
        config,
    )
    .await;
    progress.report(&job_id, PhaseName::Extraction, PhaseStatus::Completed, None).await;

    if !extraction_result.success {
        record.mark_failed(extraction_result.error.unwrap_or_else(|| "extraction failed".to_string()));
        record.scrape_duration_seconds = (Utc::now() - record.created_at).num_milliseconds() as f64 / 1000.0;
        return record;
    }

    record.record_llm_call(LlmCallRecord {
        phase: PhaseName::Extraction,
        model: extraction_result.model_used.clone(),
        input_tokens: extraction_result.tokens_used.prompt,
        output_tokens: extraction_result.tokens_used.completion,
        cost_usd: extraction_result.cost_usd,
        elapsed_seconds: extraction_result.elapsed_seconds,
        timestamp: Utc::now(),
    });

    apply_extracted_fields(&mut record, extraction_result);

    record.pages_crawled = crawl_result
        .page_results
        .iter()
        .filter(|p| p.success)
        .map(|p| p.url.clone())
        .collect();
    record.scraped_urls = record.pages_crawled.clone();
    record.crawl_depth = u32::try_from(selection_result.selected_paths.len()).unwrap_or(u32::MAX);
    record.raw_content = cap_raw_content(&crawl_result.aggregated_content, config.raw_content_cap);

    record.mark_success();
    record.scrape_duration_seconds = (Utc::now() - record.created_at).num_milliseconds() as f64 / 1000.0;
    record
}

fn cap_raw_content(content: &str, cap: usize) -> String {
    if content.len() <= cap {
        return content.to_string();
    }
    match content.char_indices().take_while(|(i, _)| *i < cap).last() {
        Some((i, c)) => content[..i + c.len_utf8()].to_string(),
        None => String::new(),
    }
}

fn apply_extracted_fields(record: &mut CompanyRecord, extraction_result: crate::types::ExtractionResult) {
    record.overall_confidence = extraction_result.overall_confidence;

    let fields = extraction_result.extracted_fields;
    let mut extra = serde_json::Map::new();

    for (key, value) in fields {
        match key.as_str() {
            "company_description" => set_if_null_str(&mut record.company_description, &value),
            "value_proposition" => set_if_null_str(&mut record.value_proposition, &value),
            "industry" => set_if_null_str(&mut record.industry, &value),
            "location" => set_if_null_str(&mut record.location, &value),
            "company_size" => set_if_null_str(&mut record.company_size, &value),
            "employee_count_range" => set_if_null_str(&mut record.employee_count_range, &value),
            "founding_year" => {
                if record.founding_year.is_none() {
                    record.founding_year = value.as_i64();
                }
            }
            "is_saas" => {
                record.is_saas = value.as_bool().unwrap_or(record.is_saas);
            }
            "company_name" | "name" => {
                // Already seeded from the input; only overwrite if still
                // matches the placeholder default behavior (never blank).
            }
            _ => {
                extra.insert(key, value);
            }
        }
    }

    record.extra = extra;
}

fn set_if_null_str(field: &mut Option<String>, value: &serde_json::Value) {
    if field.is_none() {
        if let Some(s) = value.as_str() {
            if !s.trim().is_empty() {
                *field = Some(s.to_string());
            }
        }
    }
}

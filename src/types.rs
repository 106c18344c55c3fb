//! Canonical data model shared by every phase.
//!
//! Each phase owns its result object exclusively and returns it; downstream
//! phases receive it by read-only reference. `CompanyRecord` is owned by the
//! per-company pipeline and handed to the batch orchestrator when the
//! pipeline returns.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::llm::TokenUsage;

/// Work item handed to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub homepage_url: String,
}

impl CompanyInput {
    /// Normalizes `homepage_url` by prepending `https://` when no scheme is
    /// present, per `CompanyInput` invariant.
    pub fn new(name: impl Into<String>, homepage_url: impl Into<String>) -> Self {
        let raw = homepage_url.into();
        let homepage_url = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw
        } else {
            format!("https://{raw}")
        };
        Self {
            name: name.into(),
            homepage_url,
        }
    }
}

/// Tags describing which Discovery sub-source contributed a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathSource {
    NavigationHeader,
    NavigationNav,
    NavigationFooter,
    NavigationMenu,
    Sitemap,
    RobotsAllowed,
    RobotsDisallowed,
    RobotsSitemap,
}

/// Output of Discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub canonical_url: String,
    pub all_paths: Vec<String>,
    pub navigation_paths: Vec<String>,
    pub content_paths: Vec<String>,
    pub restricted_paths: Vec<String>,
    pub sitemap_references: Vec<String>,
    pub path_sources: BTreeMap<String, Vec<PathSource>>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub elapsed_seconds: f64,
}

impl DiscoveryResult {
    #[must_use]
    pub fn unique_path_count(&self) -> usize {
        self.all_paths.len()
    }
}

/// Output of Selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionResult {
    pub success: bool,
    pub selected_paths: Vec<String>,
    pub path_priorities: BTreeMap<String, f64>,
    pub path_reasoning: BTreeMap<String, String>,
    pub rejected_paths: Vec<String>,
    pub model_used: String,
    pub tokens_used: TokenUsage,
    pub cost_usd: f64,
    pub elapsed_seconds: f64,
    pub confidence_threshold_used: f64,
    pub prompt_sent: String,
}

/// Method used to extract main content from a single crawled page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    Primary,
    Fallback,
    None,
}

/// One fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCrawlResult {
    pub url: String,
    pub success: bool,
    pub content: String,
    pub title: Option<String>,
    pub content_length: usize,
    pub elapsed_seconds: f64,
    pub extraction_method: ExtractionMethod,
    pub error: Option<String>,
}

/// Aggregated crawl output for one company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchCrawlResult {
    pub base_url: String,
    pub total_pages: usize,
    pub successful_pages: usize,
    pub failed_pages: usize,
    pub total_content_length: usize,
    pub total_elapsed_seconds: f64,
    pub aggregated_content: String,
    pub page_results: Vec<PageCrawlResult>,
    pub errors: Vec<String>,
}

/// Output of Extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub extracted_fields: Map<String, Value>,
    pub field_confidence_scores: BTreeMap<String, f64>,
    pub overall_confidence: f64,
    pub source_attribution: BTreeMap<String, Vec<String>>,
    pub tokens_used: TokenUsage,
    pub cost_usd: f64,
    pub model_used: String,
    pub elapsed_seconds: f64,
    pub error: Option<String>,
}

/// Lifecycle state of a `CompanyRecord`. Transitions only pending ->
/// in_progress -> (success | failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeStatus {
    Pending,
    InProgress,
    Success,
    Failed,
}

/// One accounted LLM call, contributing to `CompanyRecord.total_cost_usd`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmCallRecord {
    pub phase: PhaseName,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
    pub elapsed_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

/// Stable phase names surfaced to progress callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseName {
    Discovery,
    Selection,
    Crawling,
    Extraction,
}

impl PhaseName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::Discovery => "discovery",
            PhaseName::Selection => "selection",
            PhaseName::Crawling => "crawling",
            PhaseName::Extraction => "extraction",
        }
    }
}

/// The canonical company object, persisted downstream by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: String,
    pub scrape_status: ScrapeStatus,
    pub scrape_error: Option<String>,

    pub company_name: String,
    pub name: String,
    pub website: String,
    pub company_description: Option<String>,
    pub value_proposition: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub founding_year: Option<i64>,
    pub company_size: Option<String>,
    pub employee_count_range: Option<String>,
    pub is_saas: bool,

    pub overall_confidence: f64,

    /// Forward-compat sidecar: every field the schema does not name a struct
    /// member for, kept verbatim ("open-ended... map sidecar").
    pub extra: Map<String, Value>,

    pub pages_crawled: Vec<String>,
    pub scraped_urls: Vec<String>,
    pub crawl_depth: u32,
    pub raw_content: String,

    pub total_input_tokens: u32,
    pub total_output_tokens: u32,
    pub total_cost_usd: f64,
    pub llm_calls_breakdown: Vec<LlmCallRecord>,

    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub scrape_duration_seconds: f64,

    pub embedding: Option<Vec<f32>>,
}

/// Maximum length of `CompanyRecord.raw_content`.
pub const RAW_CONTENT_CAP: usize = 10_000;

impl CompanyRecord {
    #[must_use]
    pub fn pending(input: &CompanyInput) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            scrape_status: ScrapeStatus::Pending,
            scrape_error: None,
            company_name: input.name.clone(),
            name: input.name.clone(),
            website: input.homepage_url.clone(),
            company_description: None,
            value_proposition: None,
            industry: None,
            location: None,
            founding_year: None,
            company_size: None,
            employee_count_range: None,
            is_saas: false,
            overall_confidence: 0.0,
            extra: Map::new(),
            pages_crawled: Vec::new(),
            scraped_urls: Vec::new(),
            crawl_depth: 0,
            raw_content: String::new(),
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_cost_usd: 0.0,
            llm_calls_breakdown: Vec::new(),
            created_at: now,
            last_updated: now,
            scrape_duration_seconds: 0.0,
            embedding: None,
        }
    }

    pub fn mark_in_progress(&mut self) {
        self.scrape_status = ScrapeStatus::InProgress;
        self.scrape_error = None;
        self.last_updated = Utc::now();
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.scrape_status = ScrapeStatus::Failed;
        self.scrape_error = Some(error.into());
        self.last_updated = Utc::now();
    }

    pub fn mark_success(&mut self) {
        self.scrape_status = ScrapeStatus::Success;
        self.scrape_error = None;
        self.last_updated = Utc::now();
    }

    pub fn record_llm_call(&mut self, call: LlmCallRecord) {
        self.total_input_tokens += call.input_tokens;
        self.total_output_tokens += call.output_tokens;
        self.total_cost_usd += call.cost_usd;
        self.llm_calls_breakdown.push(call);
    }
}

/// Per-batch resource statistics, computed once at finalization rather
/// than accumulated through shared mutable counters during the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceStats {
    pub total_pages_crawled: usize,
    pub avg_pages_per_company: f64,
    pub avg_seconds_per_company: f64,
    pub parallel_efficiency: f64,
}

/// Output of the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_duration_seconds: f64,
    pub companies_per_minute: f64,
    pub company_records: Vec<CompanyRecord>,
    pub errors: BTreeMap<String, String>,
    pub resource_stats: ResourceStats,
}

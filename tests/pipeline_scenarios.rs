mod common;

use std::sync::Arc;

use companyintel::llm::TokenUsage;
use companyintel::{CompanyInput, LlmResponse, PipelineConfig, PriceTable, PromptStore};
use companyintel::pipeline::{self, PipelineInstance};
use companyintel::progress::ProgressSink;
use companyintel::types::ScrapeStatus;

use common::{FakeHttpFetcher, FakeLlmClient};

fn page_html(body: &str) -> String {
    format!("<html><head><title>Page</title></head><body><main>{body}</main></body></html>")
}

fn homepage_with_nav(links: &[&str]) -> String {
    let anchors: String = links.iter().map(|l| format!("<a href=\"{l}\">{l}</a>")).collect();
    format!("<html><head><title>Home</title></head><body><nav>{anchors}</nav></body></html>")
}

/// Scenario A — happy path, no locale.
#[tokio::test]
async fn happy_path_no_locale() {
    let long_content = "Stripe builds economic infrastructure for the internet. ".repeat(20);
    let fetcher = FakeHttpFetcher::new()
        .with_head_ok("https://stripe.com/")
        .with_page("https://stripe.com/", homepage_with_nav(&["/about", "/customers", "/jobs"]))
        .with_page("https://stripe.com/about", page_html(&long_content))
        .with_page("https://stripe.com/customers", page_html(&long_content))
        .with_page("https://stripe.com/jobs", page_html(&long_content));

    let selection_response = LlmResponse {
        success: true,
        content: r#"{"selected_paths": ["/about", "/customers", "/jobs"]}"#.to_string(),
        model: "amazon/nova-pro-v1".to_string(),
        tokens_used: TokenUsage { prompt: 500, completion: 100 },
        cost_usd: 0.0,
        elapsed_seconds: 0.2,
        error: None,
    };
    let extraction_response = LlmResponse {
        success: true,
        content: r#"{"company_name":"Stripe","industry":"Payments","is_saas":true,"founding_year":"2010","company_description":"Stripe builds economic infrastructure for the internet and its developer tools."}"#.to_string(),
        model: "amazon/nova-pro-v1".to_string(),
        tokens_used: TokenUsage { prompt: 2000, completion: 300 },
        cost_usd: 0.0,
        elapsed_seconds: 0.5,
        error: None,
    };
    let llm = FakeLlmClient::new(vec![selection_response, extraction_response]);

    let instance = PipelineInstance {
        fetcher: Arc::new(fetcher),
        llm: Arc::new(llm),
        prompts: PromptStore::in_memory(),
        prices: PriceTable::default(),
    };
    let config = PipelineConfig::default();
    let progress = ProgressSink::new();
    let input = CompanyInput::new("Stripe", "https://stripe.com");

    let record = pipeline::run(&instance, &input, &config, &progress).await;

    assert_eq!(record.scrape_status, ScrapeStatus::Success);
    assert!(record.is_saas);
    assert_eq!(record.founding_year, Some(2010));
    assert!(record.total_cost_usd > 0.0);
    assert_eq!(record.total_input_tokens, 500 + 2000);
    assert_eq!(record.total_output_tokens, 100 + 300);
}

/// Scenario E (partial) — extraction failure fails only that company; other
/// companies are unaffected (the batch-level variant of isolation lives in
/// `orchestrator_scenarios.rs`; this exercises the single-pipeline half).
#[tokio::test]
async fn extraction_failure_marks_company_failed_without_panicking() {
    let content = "Some real content about the company that is long enough to pass the primary extractor threshold. ".repeat(10);
    let fetcher = FakeHttpFetcher::new()
        .with_head_ok("https://acme.test/")
        .with_page("https://acme.test/", homepage_with_nav(&["/about"]))
        .with_page("https://acme.test/about", page_html(&content));

    let selection_response = LlmResponse {
        success: true,
        content: r#"{"selected_paths": ["/about"]}"#.to_string(),
        model: "amazon/nova-pro-v1".to_string(),
        tokens_used: TokenUsage { prompt: 100, completion: 20 },
        cost_usd: 0.0,
        elapsed_seconds: 0.1,
        error: None,
    };
    // No second scripted response: extraction call fails.
    let llm = FakeLlmClient::new(vec![selection_response]);

    let instance = PipelineInstance {
        fetcher: Arc::new(fetcher),
        llm: Arc::new(llm),
        prompts: PromptStore::in_memory(),
        prices: PriceTable::default(),
    };
    let config = PipelineConfig::default();
    let progress = ProgressSink::new();
    let input = CompanyInput::new("Acme", "https://acme.test");

    let record = pipeline::run(&instance, &input, &config, &progress).await;

    assert_eq!(record.scrape_status, ScrapeStatus::Failed);
    assert!(record.scrape_error.is_some());
}

/// Input validation: empty company name is rejected synchronously, before
/// any phase runs.
#[tokio::test]
async fn empty_company_name_is_rejected_synchronously() {
    let instance = PipelineInstance {
        fetcher: Arc::new(FakeHttpFetcher::new()),
        llm: Arc::new(FakeLlmClient::always_failing()),
        prompts: PromptStore::in_memory(),
        prices: PriceTable::default(),
    };
    let config = PipelineConfig::default();
    let progress = ProgressSink::new();
    let input = CompanyInput::new("", "https://acme.test");

    let record = pipeline::run(&instance, &input, &config, &progress).await;

    assert_eq!(record.scrape_status, ScrapeStatus::Failed);
    assert!(record.scrape_error.unwrap().contains("company name"));
}

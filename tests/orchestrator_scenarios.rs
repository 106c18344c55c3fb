mod common;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use companyintel::llm::TokenUsage;
use companyintel::{BatchConfig, BatchOrchestrator, CompanyInput, LlmClient, LlmResponse, PipelineConfig, PriceTable, PromptStore};

use common::FakeHttpFetcher;

fn page_html(body: &str) -> String {
    format!("<html><head><title>Page</title></head><body><main>{body}</main></body></html>")
}

fn homepage_with_nav(links: &[&str]) -> String {
    let anchors: String = links.iter().map(|l| format!("<a href=\"{l}\">{l}</a>")).collect();
    format!("<html><head><title>Home</title></head><body><nav>{anchors}</nav></body></html>")
}

/// Routes scripted responses by *content* rather than call order, since five
/// companies share one `LlmClient` and their calls interleave under batch
/// concurrency. Selection calls (identified by the `Domain:` marker the
/// selection prompt always includes) always succeed; Extraction calls
/// (identified by `Company name:`) fail only for the configured company.
struct PoisonedExtractionLlmClient {
    poisoned_company: String,
}

impl LlmClient for PoisonedExtractionLlmClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        model: &'a str,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = LlmResponse> + Send + 'a>> {
        let poisoned_marker = format!("Company name: {}", self.poisoned_company);
        let is_selection_call = prompt.contains("Domain:");
        let is_poisoned_extraction = prompt.contains(&poisoned_marker);
        let model = model.to_string();

        Box::pin(async move {
            if is_selection_call {
                return LlmResponse {
                    success: true,
                    content: r#"{"selected_paths": ["/about"]}"#.to_string(),
                    model,
                    tokens_used: TokenUsage { prompt: 100, completion: 20 },
                    cost_usd: 0.0,
                    elapsed_seconds: 0.05,
                    error: None,
                };
            }
            if is_poisoned_extraction {
                return LlmResponse::failure(model, "simulated extraction outage");
            }
            LlmResponse {
                success: true,
                content: r#"{"company_name":"Co","industry":"Software","company_description":"Builds software for other businesses, with a bit of extra detail to read."}"#.to_string(),
                model,
                tokens_used: TokenUsage { prompt: 800, completion: 150 },
                cost_usd: 0.0,
                elapsed_seconds: 0.1,
                error: None,
            }
        })
    }
}

/// Scenario E — one poisoned company fails inside Extraction; the batch
/// isolates that failure and still reports the other four as successful.
#[tokio::test]
async fn batch_isolates_a_single_extraction_failure() {
    let companies = [
        ("Alpha", "https://alpha.test"),
        ("Beta", "https://beta.test"),
        ("Gamma", "https://gamma.test"),
        ("Broken", "https://broken.test"),
        ("Delta", "https://delta.test"),
    ];

    let long_content = "Real business content describing what this company does. ".repeat(20);
    let mut fetcher = FakeHttpFetcher::new();
    for (_, homepage) in &companies {
        let root = format!("{homepage}/");
        fetcher = fetcher
            .with_head_ok(root.clone())
            .with_page(root, homepage_with_nav(&["/about"]))
            .with_page(format!("{homepage}/about"), page_html(&long_content));
    }

    let llm = PoisonedExtractionLlmClient {
        poisoned_company: "Broken".to_string(),
    };

    let orchestrator = BatchOrchestrator::new(
        Arc::new(fetcher),
        Arc::new(llm),
        PromptStore::in_memory(),
        PriceTable::default(),
        PipelineConfig::default(),
        BatchConfig::default(),
    );

    let inputs: Vec<CompanyInput> = companies.iter().map(|(name, url)| CompanyInput::new(*name, *url)).collect();
    let result = orchestrator.process_batch(inputs, None).await;
    orchestrator.shutdown();

    assert_eq!(result.total, 5);
    assert_eq!(result.successful, 4);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors.contains_key("Broken"));
}

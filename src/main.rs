//! Ambient smoke-test binary: wires logging and default configuration and
//! runs one batch from argv. Not a CLI product — argument handling is
//! deliberately minimal (company name/URL pairs, nothing else).

use std::sync::Arc;

use companyintel::{BatchConfig, BatchOrchestrator, CompanyInput, PipelineConfig, PriceTable, PromptStore, ReqwestFetcher};

struct EchoLlmClient;

impl companyintel::LlmClient for EchoLlmClient {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
        model: &'a str,
        _timeout: std::time::Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = companyintel::LlmResponse> + Send + 'a>> {
        Box::pin(async move {
            companyintel::LlmResponse::failure(model, "no LLM client configured for the demo binary")
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() % 2 != 0 || args.is_empty() {
        anyhow::bail!("usage: companyintel <name> <homepage_url> [<name> <homepage_url> ...]");
    }

    let inputs: Vec<CompanyInput> = args
        .chunks(2)
        .map(|pair| CompanyInput::new(pair[0].clone(), pair[1].clone()))
        .collect();

    let orchestrator = BatchOrchestrator::new(
        Arc::new(ReqwestFetcher::new()),
        Arc::new(EchoLlmClient),
        PromptStore::in_memory(),
        PriceTable::default(),
        PipelineConfig::default(),
        BatchConfig::default(),
    );

    tracing::info!(count = inputs.len(), "starting batch");
    let result = orchestrator.process_batch(inputs, None).await;
    orchestrator.shutdown();

    tracing::info!(
        successful = result.successful,
        failed = result.failed,
        duration_seconds = result.total_duration_seconds,
        "batch finished"
    );

    for record in &result.company_records {
        println!(
            "{}\t{:?}\tconfidence={:.2}\terror={}",
            record.name,
            record.scrape_status,
            record.overall_confidence,
            record.scrape_error.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

//! Batch orchestrator: processes many `CompanyInput`s
//! concurrently with resource pooling and partial-failure isolation.

mod pool;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{BatchConfig, PipelineConfig};
use crate::http_client::HttpFetcher;
use crate::llm::{LlmClient, PriceTable};
use crate::pipeline::{self, PipelineInstance};
use crate::progress::{ProgressCallback, ProgressSink};
use crate::prompts::PromptStore;
use crate::types::{BatchResult, CompanyInput, CompanyRecord, ResourceStats};

pub use pool::InstancePool;

/// Processes a batch of companies under `max_concurrent_companies`
/// concurrency, with an optional pooled-and-reused `PipelineInstance` per
/// worker slot (rationale: pipeline construction is expensive —
/// it opens HTTP clients and loads prompts — so reuse amortizes it).
pub struct BatchOrchestrator {
    fetcher: Arc<dyn HttpFetcher>,
    llm: Arc<dyn LlmClient>,
    prompts: PromptStore,
    prices: PriceTable,
    pipeline_config: PipelineConfig,
    batch_config: BatchConfig,
    progress: Arc<ProgressSink>,
    instance_pool: Arc<InstancePool<PipelineInstance>>,
}

impl BatchOrchestrator {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        llm: Arc<dyn LlmClient>,
        prompts: PromptStore,
        prices: PriceTable,
        pipeline_config: PipelineConfig,
        batch_config: BatchConfig,
    ) -> Self {
        let fetcher_for_factory = Arc::clone(&fetcher);
        let llm_for_factory = Arc::clone(&llm);
        let prompts_for_factory = prompts.clone();
        let prices_for_factory = prices.clone();

        let instance_pool = InstancePool::new(batch_config.max_concurrent_companies, move || PipelineInstance {
            fetcher: Arc::clone(&fetcher_for_factory),
            llm: Arc::clone(&llm_for_factory),
            prompts: prompts_for_factory.clone(),
            prices: prices_for_factory.clone(),
        });

        Self {
            fetcher,
            llm,
            prompts,
            prices,
            pipeline_config,
            batch_config,
            progress: Arc::new(ProgressSink::new()),
            instance_pool,
        }
    }

    pub fn progress_sink(&self) -> Arc<ProgressSink> {
        Arc::clone(&self.progress)
    }

    /// Runs the batch to completion. `on_progress`, if given, is invoked
    /// with the cumulative processed count after each company finishes.
    pub async fn process_batch(&self, inputs: Vec<CompanyInput>, on_progress: Option<ProgressCallback>) -> BatchResult {
        let start_time = Utc::now();
        let total = inputs.len();
        let semaphore = Arc::new(Semaphore::new(self.batch_config.max_concurrent_companies.max(1)));
        let processed = Arc::new(AtomicUsize::new(0));

        let mut tasks = JoinSet::new();
        for input in inputs {
            let semaphore = Arc::clone(&semaphore);
            let instance_pool = if self.batch_config.enable_resource_pooling {
                Some(Arc::clone(&self.instance_pool))
            } else {
                None
            };
            let fresh_fetcher = Arc::clone(&self.fetcher);
            let fresh_llm = Arc::clone(&self.llm);
            let fresh_prompts = self.prompts.clone();
            let fresh_prices = self.prices.clone();
            let config = self.pipeline_config.clone();
            let progress = Arc::clone(&self.progress);
            let processed = Arc::clone(&processed);
            let on_progress = on_progress.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire().await;
                let company_name = input.name.clone();

                let record = if let Some(pool) = instance_pool {
                    let guard = pool.acquire();
                    pipeline::run(&guard, &input, &config, &progress).await
                } else {
                    let instance = PipelineInstance {
                        fetcher: fresh_fetcher,
                        llm: fresh_llm,
                        prompts: fresh_prompts,
                        prices: fresh_prices,
                    };
                    pipeline::run(&instance, &input, &config, &progress).await
                };

                let count = processed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(callback) = on_progress {
                    callback(&count.to_string(), "processed", &company_name);
                }

                (company_name, record)
            });
        }

        let mut company_records = Vec::with_capacity(total);
        let mut errors = std::collections::BTreeMap::new();
        let mut successful = 0usize;
        let mut failed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((company_name, record)) => {
                    match record.scrape_status {
                        crate::types::ScrapeStatus::Success => successful += 1,
                        _ => {
                            failed += 1;
                            if let Some(error) = &record.scrape_error {
                                errors.insert(company_name, error.clone());
                            }
                        }
                    }
                    company_records.push(record);
                }
                Err(join_error) => {
                    failed += 1;
                    errors.insert("<unknown>".to_string(), format!("task panicked: {join_error}"));
                }
            }
        }

        let end_time = Utc::now();
        let total_duration_seconds = (end_time - start_time).num_milliseconds() as f64 / 1000.0;
        let companies_per_minute = if total_duration_seconds > 0.0 {
            (successful as f64 / total_duration_seconds) * 60.0
        } else {
            0.0
        };

        let resource_stats = compute_resource_stats(&company_records, total_duration_seconds);

        BatchResult {
            total,
            successful,
            failed,
            start_time,
            end_time,
            total_duration_seconds,
            companies_per_minute,
            company_records,
            errors,
            resource_stats,
        }
    }

    /// Waits for any remaining shared state to settle and drains the
    /// instance pool (shutdown contract). Task completion
    /// itself is awaited by `process_batch`, so this mainly exists as the
    /// explicit "close shared clients" step for long-lived orchestrators.
    pub fn shutdown(&self) {
        self.instance_pool.shutdown();
    }
}

fn compute_resource_stats(company_records: &[CompanyRecord], total_duration_seconds: f64) -> ResourceStats {
    let total_pages_crawled: usize = company_records.iter().map(|r| r.pages_crawled.len()).sum();
    let count = company_records.len().max(1) as f64;
    let avg_pages_per_company = total_pages_crawled as f64 / count;
    let sum_wall_times: f64 = company_records.iter().map(|r| r.scrape_duration_seconds).sum();
    let avg_seconds_per_company = sum_wall_times / count;
    let parallel_efficiency = if total_duration_seconds > 0.0 {
        sum_wall_times / total_duration_seconds
    } else {
        0.0
    };

    ResourceStats {
        total_pages_crawled,
        avg_pages_per_company,
        avg_seconds_per_company,
        parallel_efficiency,
    }
}

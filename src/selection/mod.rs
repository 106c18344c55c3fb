//! Selection phase: chooses the subset of discovered paths most
//! likely to carry target fields, via a single LLM call with one bounded
//! automatic retry.

mod fallback;
mod parsing;
mod prompt;

use std::time::{Duration, Instant};

use crate::config::PipelineConfig;
use crate::llm::{LlmClient, PriceTable};
use crate::prompts::PromptStore;
use crate::types::SelectionResult;

const SELECTION_MODEL: &str = "amazon/nova-pro-v1";
const LARGE_SITE_PREFILTER_THRESHOLD: usize = 500;

/// Exposes the deterministic fallback path list so the per-company pipeline
/// can seed Selection's candidate set when Discovery itself returns nothing.
#[must_use]
pub fn fallback_paths(locale: Option<&str>) -> Vec<String> {
    fallback::fallback_paths(locale)
}

/// Runs Selection for one company. Never returns `Err`: any LLM failure
/// degrades to the deterministic fallback result.
pub async fn select(
    llm: &dyn LlmClient,
    prompts: &PromptStore,
    prices: &PriceTable,
    all_paths: &[String],
    domain: &str,
    locale: Option<&str>,
    config: &PipelineConfig,
) -> SelectionResult {
    select_inner(
        llm,
        prompts,
        prices,
        all_paths,
        domain,
        locale,
        config.selection_min_confidence,
        config,
        false,
    )
    .await
}

/// Boxed-future recursion (the one automatic retry re-enters this function
/// with a lower confidence threshold); a plain `async fn` cannot call itself
/// since its own future type would be infinitely-sized.
#[allow(clippy::too_many_arguments)]
fn select_inner<'a>(
    llm: &'a dyn LlmClient,
    prompts: &'a PromptStore,
    prices: &'a PriceTable,
    all_paths: &'a [String],
    domain: &'a str,
    locale: Option<&'a str>,
    min_confidence: f64,
    config: &'a PipelineConfig,
    is_retry: bool,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = SelectionResult> + Send + 'a>> {
    Box::pin(async move {
        let started = Instant::now();
        let candidate_paths = prefilter(all_paths);
        let prompt_sent = prompt::build_prompt(
            prompts,
            domain,
            &candidate_paths,
            min_confidence,
            config.selection_max_pages,
        );

        let timeout = Duration::from_secs(config.selection_timeout_secs);
        let response = llm.complete(&prompt_sent, SELECTION_MODEL, timeout).await;

        if !response.success {
            return fallback_result(locale, min_confidence, started, &prompt_sent);
        }

        let parsed = match parsing::parse_selection_response(&response.content, all_paths) {
            Ok(parsed) => parsed,
            Err(_) => return fallback_result(locale, min_confidence, started, &prompt_sent),
        };

        let mut selected_paths = parsed.selected_paths;
        selected_paths.truncate(config.selection_max_pages);

        if selected_paths.len() < config.selection_min_paths_for_retry
            && !is_retry
            && min_confidence > config.selection_retry_confidence
        {
            return select_inner(
                llm,
                prompts,
                prices,
                all_paths,
                domain,
                locale,
                config.selection_retry_confidence,
                config,
                true,
            )
            .await;
        }

        let path_priorities = selected_paths
            .iter()
            .map(|p| (p.clone(), min_confidence.clamp(0.0, 1.0)))
            .collect();

        let cost_usd = prices.cost_usd(SELECTION_MODEL, response.tokens_used);

        SelectionResult {
            success: true,
            selected_paths,
            path_priorities,
            path_reasoning: parsed.path_reasoning,
            rejected_paths: parsed.rejected_paths,
            model_used: SELECTION_MODEL.to_string(),
            tokens_used: response.tokens_used,
            cost_usd,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            confidence_threshold_used: min_confidence,
            prompt_sent,
        }
    })
}

fn fallback_result(locale: Option<&str>, min_confidence: f64, started: Instant, prompt_sent: &str) -> SelectionResult {
    let selected_paths = fallback::fallback_paths(locale);
    let path_priorities = selected_paths
        .iter()
        .map(|p| (p.clone(), fallback::FALLBACK_PRIORITY))
        .collect();
    let path_reasoning = selected_paths
        .iter()
        .map(|p| (p.clone(), fallback::FALLBACK_REASONING.to_string()))
        .collect();

    SelectionResult {
        success: true,
        selected_paths,
        path_priorities,
        path_reasoning,
        rejected_paths: Vec::new(),
        model_used: fallback::FALLBACK_MODEL.to_string(),
        tokens_used: crate::llm::TokenUsage::default(),
        cost_usd: 0.0,
        elapsed_seconds: started.elapsed().as_secs_f64(),
        confidence_threshold_used: min_confidence,
        prompt_sent: prompt_sent.to_string(),
    }
}

/// Keeps only first-level paths when the candidate set is huge, bounding
/// prompt size.
fn prefilter(all_paths: &[String]) -> Vec<String> {
    if all_paths.len() <= LARGE_SITE_PREFILTER_THRESHOLD {
        return all_paths.to_vec();
    }
    all_paths
        .iter()
        .filter(|p| p.as_str() == "/" || p.matches('/').count() == 1)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("/section-{i}/deep/path")).collect()
    }

    #[test]
    fn prefilter_keeps_all_paths_under_threshold() {
        let all = paths(10);
        assert_eq!(prefilter(&all).len(), 10);
    }

    #[test]
    fn prefilter_keeps_only_first_level_paths_over_threshold() {
        let mut all = paths(600);
        all.push("/about".to_string());
        all.push("/".to_string());
        let filtered = prefilter(&all);
        assert!(filtered.contains(&"/about".to_string()));
        assert!(filtered.contains(&"/".to_string()));
        assert!(filtered.iter().all(|p| p == "/" || p.matches('/').count() == 1));
    }
}

//! The LLM black-box contract: a single prompt string in, a
//! token-accounted response out. Safe for concurrent calls from many
//! workers. Cost is computed by the caller from a per-model price table —
//! the adapter itself returns only token counts authoritatively.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Authoritative token counts for one LLM call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
}

impl TokenUsage {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.prompt + self.completion
    }
}

/// Response from an LLM completion call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub success: bool,
    pub content: String,
    pub model: String,
    pub tokens_used: TokenUsage,
    pub cost_usd: f64,
    pub elapsed_seconds: f64,
    pub error: Option<String>,
}

impl LlmResponse {
    #[must_use]
    pub fn failure(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            model: model.into(),
            tokens_used: TokenUsage::default(),
            cost_usd: 0.0,
            elapsed_seconds: 0.0,
            error: Some(error.into()),
        }
    }
}

/// Text-in/text-out LLM collaborator, implemented by callers against
/// whichever path-selection or field-extraction model they host.
///
/// Boxed-future signature (rather than `async fn` in trait) so the trait
/// stays object-safe — `Arc<dyn LlmClient>` is how the pipeline and
/// orchestrator share one client across workers.
pub trait LlmClient: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        model: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = LlmResponse> + Send + 'a>>;
}

/// Per-million-token USD pricing, keyed by model name.
///
/// When an adapter doesn't return completion tokens separately, the
/// convention is to estimate `output_tokens == prompt_tokens`.
/// This is knowingly approximate; callers with authoritative completion-token
/// counts should prefer those rather than silently repeating the estimate —
/// `PriceTable::cost_usd` never performs that estimation itself, it only
/// prices whatever `TokenUsage` it is given.
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: HashMap<String, (f64, f64)>,
}

impl Default for PriceTable {
    fn default() -> Self {
        let mut prices = HashMap::new();
        // (input_usd_per_million, output_usd_per_million)
        prices.insert("amazon/nova-pro-v1".to_string(), (0.8, 3.2));
        prices.insert("amazon/nova-lite-v1".to_string(), (0.06, 0.24));
        prices.insert("gpt-4o".to_string(), (2.5, 10.0));
        prices.insert("gpt-4o-mini".to_string(), (0.15, 0.6));
        Self { prices }
    }
}

impl PriceTable {
    #[must_use]
    pub fn with_price(mut self, model: impl Into<String>, input_per_million: f64, output_per_million: f64) -> Self {
        self.prices.insert(model.into(), (input_per_million, output_per_million));
        self
    }

    /// Computes USD cost for the given token usage under `model`. Unknown
    /// models fall back to the `amazon/nova-pro-v1` row, which mirrors the
    /// original source's single hard-coded rate (`$0.0008` per 1K tokens,
    /// i.e. $0.8/M) used when no per-model entry is registered.
    #[must_use]
    pub fn cost_usd(&self, model: &str, usage: TokenUsage) -> f64 {
        let (input_rate, output_rate) = self
            .prices
            .get(model)
            .copied()
            .unwrap_or((0.8, 0.8));
        (f64::from(usage.prompt) * input_rate + f64::from(usage.completion) * output_rate) / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_falls_back_to_default_rate() {
        let table = PriceTable::default();
        let cost = table.cost_usd("unknown-model", TokenUsage { prompt: 1_000_000, completion: 0 });
        assert!((cost - 0.8).abs() < 1e-9);
    }

    #[test]
    fn known_model_uses_its_own_rate() {
        let table = PriceTable::default().with_price("test-model", 1.0, 2.0);
        let cost = table.cost_usd("test-model", TokenUsage { prompt: 1_000_000, completion: 1_000_000 });
        assert!((cost - 3.0).abs() < 1e-9);
    }
}

//! Prompt construction for the Selection LLM call.

use crate::prompts::{PromptKind, PromptStore};

pub fn build_prompt(
    store: &PromptStore,
    domain: &str,
    candidate_paths: &[String],
    min_confidence: f64,
    max_pages: usize,
) -> String {
    let instructions = store.get(PromptKind::PageSelection);
    let candidates_json = serde_json::to_string(candidate_paths).unwrap_or_else(|_| "[]".to_string());

    format!(
        "{instructions}\n\nDomain: {domain}\nConfidence threshold: {min_confidence}\nMaximum selection count: {max_pages}\nCandidate paths: {candidates_json}"
    )
}

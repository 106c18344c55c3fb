//! Prompt construction for the Extraction LLM call.

use crate::prompts::{PromptKind, PromptStore};

use super::schema::SCHEMA_FIELDS;

const TRUNCATION_MARKER: &str = "... [TRUNCATED]";

/// Caps `aggregated_content` at `content_cap` chars before prompting,
/// marking the cut explicitly so the model knows the text is incomplete.
pub fn cap_content(aggregated_content: &str, content_cap: usize) -> String {
    if aggregated_content.len() <= content_cap {
        return aggregated_content.to_string();
    }
    let cut = aggregated_content
        .char_indices()
        .take_while(|(i, _)| *i < content_cap)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    let mut capped = aggregated_content[..cut].to_string();
    capped.push_str(TRUNCATION_MARKER);
    capped
}

pub fn build_prompt(store: &PromptStore, company_name: &str, page_count: usize, capped_content: &str) -> String {
    let instructions = store.get(PromptKind::Extraction);
    let schema_json = serde_json::to_string(SCHEMA_FIELDS).unwrap_or_else(|_| "[]".to_string());
    format!(
        "{instructions}\n\nSchema fields: {schema_json}\nCompany name: {company_name}\nPages crawled: {page_count}\nContent length: {}\n\n{capped_content}",
        capped_content.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_content_and_marks_truncation() {
        let content = "a".repeat(100);
        let capped = cap_content(&content, 10);
        assert!(capped.ends_with("... [TRUNCATED]"));
        assert_eq!(capped.len(), 10 + "... [TRUNCATED]".len());
    }

    #[test]
    fn leaves_short_content_untouched() {
        let content = "short";
        assert_eq!(cap_content(content, 100), "short");
    }
}

//! Deterministic aggregation of per-page crawl results.
//!
//! Extraction's prompt quotes `aggregated_content` verbatim and relies on
//! this exact layout for source attribution, so ordering and formatting
//! here are load-bearing, not cosmetic.

use crate::types::PageCrawlResult;

const SEPARATOR: &str = "----------------------------------------";

/// Sorts successful pages by URL and composes the header/body/footer blob.
pub fn aggregate(base_url: &str, page_results: &[PageCrawlResult]) -> String {
    let mut successful: Vec<&PageCrawlResult> = page_results.iter().filter(|p| p.success).collect();
    successful.sort_by(|a, b| a.url.cmp(&b.url));

    if successful.is_empty() {
        return String::new();
    }

    let total_chars: usize = successful.iter().map(|p| p.content.len()).sum();

    let mut out = String::new();
    out.push_str(&format!("Domain: {base_url}\n"));
    out.push_str(&format!("Pages crawled: {}\n", successful.len()));
    out.push_str(&format!("Total characters: {total_chars}\n"));
    out.push_str(SEPARATOR);
    out.push('\n');

    for (index, page) in successful.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {}\nTitle: {}\nLength: {} chars\n{}\n",
            index + 1,
            page.url,
            page.title.as_deref().unwrap_or("(none)"),
            page.content_length,
            SEPARATOR
        ));
        if page.content.is_empty() {
            out.push_str("[No content extracted]\n");
        } else {
            out.push_str(&page.content);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(SEPARATOR);
    out.push_str("\nProcessed URLs:\n");
    for page in &successful {
        out.push_str(&format!("- {}\n", page.url));
    }

    out
}

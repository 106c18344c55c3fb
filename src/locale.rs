//! Locale detection from a homepage URL's path.
//!
//! Checked in order, first match wins; underscores are normalized to
//! hyphens; purely-numeric captures are rejected.

use once_cell::sync::Lazy;
use regex::Regex;

const PATTERN_SOURCES: [&str; 5] = [
    r"^/([a-z]{2}-[a-z]{2})(/|$)",
    r"^/([a-z]{2}_[a-z]{2})(/|$)",
    r"^/([a-z]{2})(/|$)",
    r"^/([a-z]{2}-[a-z]{3})(/|$)",
    r"^/([a-z]{3}-[a-z]{2})(/|$)",
];

static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PATTERN_SOURCES
        .iter()
        .map(|p| Regex::new(p).expect("static locale regex is valid"))
        .collect()
});

/// Extracts a locale segment (e.g. `en-ca`) from a homepage URL's path, or
/// `None` if no pattern matches. Idempotent: `extract_locale(url) ==
/// extract_locale("https://host" + path(url))`.
#[must_use]
pub fn extract_locale(url: &str) -> Option<String> {
    let path = url::Url::parse(url).ok().map(|u| u.path().to_ascii_lowercase())?;

    for pattern in PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&path) {
            let raw = caps.get(1)?.as_str();
            let normalized = raw.replace('_', "-");
            if normalized.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            return Some(normalized);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_hyphenated_locale() {
        assert_eq!(
            extract_locale("https://www.volvocars.com/en-ca/"),
            Some("en-ca".to_string())
        );
    }

    #[test]
    fn normalizes_underscore_to_hyphen() {
        assert_eq!(
            extract_locale("https://example.com/en_us/about"),
            Some("en-us".to_string())
        );
    }

    #[test]
    fn rejects_numeric_capture() {
        assert_eq!(extract_locale("https://example.com/12/about"), None);
    }

    #[test]
    fn no_locale_segment_returns_none() {
        assert_eq!(extract_locale("https://example.com/about"), None);
    }

    #[test]
    fn idempotent_across_equivalent_urls() {
        let a = extract_locale("https://www.volvocars.com/en-ca/about");
        let b = extract_locale("https://host/en-ca/about");
        assert_eq!(a, b);
    }
}

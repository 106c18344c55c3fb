//! Header/footer/nav link discovery.
//!
//! Fetches the homepage once and extracts anchor hrefs found within
//! `<header>`, `<nav>`, `<footer>`, and common menu-class containers.
//! Normalizes each href to an absolute URL, keeps only same-domain links,
//! deduplicates, and strips back to path form (leading `/`, root preserved).
//!
//! The "click common menu-toggle elements to expand collapsed navigation"
//! step is the seam `HttpFetcher::fetch_rendered` exists for —
//! see `crate::http_client` — this module only needs the resulting HTML.

use std::collections::BTreeSet;
use std::time::Duration;

use scraper::{Html, Selector};
use url::Url;

use crate::error::DiscoveryError;
use crate::http_client::HttpFetcher;
use crate::types::PathSource;

/// CSS selectors whose anchors count as navigation, tagged with the
/// `PathSource` they contribute (explicit selector list).
const SELECTORS: &[(&str, PathSource)] = &[
    ("header a[href]", PathSource::NavigationHeader),
    ("nav a[href]", PathSource::NavigationNav),
    ("footer a[href]", PathSource::NavigationFooter),
    (".menu a[href]", PathSource::NavigationMenu),
    (".navigation a[href]", PathSource::NavigationMenu),
    (".main-nav a[href]", PathSource::NavigationMenu),
    (".primary-nav a[href]", PathSource::NavigationMenu),
    (".dropdown-menu a[href]", PathSource::NavigationMenu),
    (".mobile-menu a[href]", PathSource::NavigationMenu),
];

pub struct NavigationOutcome {
    /// Deduplicated paths with the sources that produced each one.
    pub paths: Vec<(String, PathSource)>,
}

pub async fn discover_navigation(
    fetcher: &dyn HttpFetcher,
    canonical_url: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<NavigationOutcome, DiscoveryError> {
    let response = fetcher
        .fetch_rendered(canonical_url, timeout, user_agent)
        .await
        .map_err(|e| DiscoveryError::Navigation(e.to_string()))?;

    let base = Url::parse(&response.final_url)
        .or_else(|_| Url::parse(canonical_url))
        .map_err(|e| DiscoveryError::Navigation(format!("invalid base URL: {e}")))?;

    let document = Html::parse_document(&response.body);
    let mut seen: BTreeSet<(String, PathSource)> = BTreeSet::new();

    for (selector_str, source) in SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(path) = normalize_same_domain_path(&base, href) {
                seen.insert((path, *source));
            }
        }
    }

    Ok(NavigationOutcome {
        paths: seen.into_iter().collect(),
    })
}

/// Resolves `href` against `base`, keeps it only if same-domain, and
/// returns the path form (leading `/`, root preserved as `/`).
fn normalize_same_domain_path(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href).ok()?;
    if resolved.host_str() != base.host_str() {
        return None;
    }
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    let path = resolved.path();
    Some(if path.is_empty() { "/".to_string() } else { path.to_string() })
}

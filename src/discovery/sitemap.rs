//! Sitemap discovery.
//!
//! Fetches `/sitemap.xml`, extracts every `<loc>`, and recurses one level
//! into nested sitemaps (a sitemap-of-sitemaps). If `locale_filter` is set,
//! retains only URLs whose path contains `/<locale>/` (or the underscore
//! form) — the key optimization for large international sites.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::DiscoveryError;
use crate::http_client::HttpFetcher;

static LOC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<loc>\s*([^<\s][^<]*?)\s*</loc>").expect("static regex is valid"));

pub struct SitemapOutcome {
    pub paths: Vec<String>,
    /// Sitemap URLs referenced (top-level and nested), for observability.
    pub sitemap_references: Vec<String>,
}

pub async fn discover_sitemap(
    fetcher: &dyn HttpFetcher,
    canonical_url: &str,
    locale_filter: Option<&str>,
    timeout: Duration,
    user_agent: &str,
) -> Result<SitemapOutcome, DiscoveryError> {
    let base = Url::parse(canonical_url)
        .map_err(|e| DiscoveryError::Sitemap(format!("invalid base URL: {e}")))?;
    let sitemap_url = base
        .join("/sitemap.xml")
        .map_err(|e| DiscoveryError::Sitemap(format!("could not build sitemap URL: {e}")))?;

    let mut sitemap_references = vec![sitemap_url.to_string()];
    let top_locs = fetch_locs(fetcher, sitemap_url.as_str(), timeout, user_agent).await?;

    let mut paths = Vec::new();
    for loc in top_locs {
        if is_sitemap_reference(&loc) {
            sitemap_references.push(loc.clone());
            // Recurse exactly one level; deeper sitemap-of-sitemaps nesting is not followed.
            if let Ok(nested_locs) = fetch_locs(fetcher, &loc, timeout, user_agent).await {
                paths.extend(nested_locs.into_iter().filter_map(|l| to_path(&base, &l)));
            }
        } else if let Some(path) = to_path(&base, &loc) {
            paths.push(path);
        }
    }

    if let Some(locale) = locale_filter {
        let dash_needle = format!("/{locale}/");
        let underscore_needle = format!("/{}/", locale.replace('-', "_"));
        paths.retain(|p| p.contains(&dash_needle) || p.contains(&underscore_needle));
    }

    Ok(SitemapOutcome {
        paths,
        sitemap_references,
    })
}

fn is_sitemap_reference(url: &str) -> bool {
    url.to_ascii_lowercase().ends_with(".xml")
}

fn to_path(base: &Url, absolute_or_path: &str) -> Option<String> {
    let resolved = base.join(absolute_or_path).ok()?;
    if resolved.host_str() != base.host_str() {
        return None;
    }
    let path = resolved.path();
    Some(if path.is_empty() { "/".to_string() } else { path.to_string() })
}

async fn fetch_locs(
    fetcher: &dyn HttpFetcher,
    url: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<Vec<String>, DiscoveryError> {
    let response = fetcher
        .fetch(url, timeout, user_agent)
        .await
        .map_err(|e| DiscoveryError::Sitemap(e.to_string()))?;

    Ok(LOC_PATTERN
        .captures_iter(&response.body)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .collect())
}

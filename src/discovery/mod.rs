//! Discovery phase: finds every crawlable path on a homepage
//! without invoking an LLM.
//!
//! Runs three sub-discoveries concurrently under one overall timeout
//! (`PipelineConfig::discovery_timeout_secs`): navigation-link scraping,
//! sitemap parsing, and robots.txt parsing. Each sub-discovery's own failure
//! is recorded as an error but does not abort the others — grounded on the
//! orchestrator's `tokio::time::timeout` + `join!`-style fan-out, simplified
//! from its task-queue form since Discovery has a fixed, small task count.
//! A global timeout, by contrast, is recorded as a warning: the pipeline
//! still has an empty-but-valid path set to fall back on, so it's degraded
//! rather than broken.

mod canonicalize;
mod navigation;
mod robots;
mod sitemap;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::config::PipelineConfig;
use crate::http_client::HttpFetcher;
use crate::locale::extract_locale;
use crate::types::{DiscoveryResult, PathSource};

const DEFAULT_USER_AGENT: &str = "companyintel/0.1";

/// Runs Discovery for one company homepage. Never returns `Err`: every
/// internal failure degrades to an entry in `DiscoveryResult.errors` or
/// `.warnings` so the pipeline can decide how to proceed.
pub async fn discover(fetcher: &dyn HttpFetcher, homepage_url: &str, config: &PipelineConfig) -> DiscoveryResult {
    let started = Instant::now();
    let overall_timeout = Duration::from_secs(config.discovery_timeout_secs);

    let canon = canonicalize::canonicalize(fetcher, homepage_url).await;
    let canonical_url = canon.canonical_url;
    let mut warnings: Vec<String> = canon.warning.into_iter().collect();
    let mut errors = Vec::new();

    let locale_filter = extract_locale(&canonical_url);
    let sub_timeout = overall_timeout;

    let nav_fut = navigation::discover_navigation(fetcher, &canonical_url, sub_timeout, DEFAULT_USER_AGENT);
    let sitemap_fut = sitemap::discover_sitemap(
        fetcher,
        &canonical_url,
        locale_filter.as_deref(),
        sub_timeout,
        DEFAULT_USER_AGENT,
    );
    let robots_fut = robots::discover_robots(
        fetcher,
        &canonical_url,
        &config.user_agent_filter,
        sub_timeout,
        DEFAULT_USER_AGENT,
    );

    let joined = timeout(overall_timeout, async { tokio::join!(nav_fut, sitemap_fut, robots_fut) }).await;

    let mut path_sources: BTreeMap<String, Vec<PathSource>> = BTreeMap::new();
    let mut navigation_paths = Vec::new();
    let mut content_paths = Vec::new();
    let mut restricted_paths = Vec::new();
    let mut sitemap_references = Vec::new();

    match joined {
        Ok((nav_result, sitemap_result, robots_outcome)) => {
            match nav_result {
                Ok(outcome) => {
                    for (path, source) in outcome.paths {
                        navigation_paths.push(path.clone());
                        path_sources.entry(path).or_default().push(source);
                    }
                }
                Err(e) => errors.push(e.to_string()),
            }

            match sitemap_result {
                Ok(outcome) => {
                    for path in outcome.paths {
                        content_paths.push(path.clone());
                        path_sources.entry(path).or_default().push(PathSource::Sitemap);
                    }
                    sitemap_references.extend(outcome.sitemap_references);
                }
                Err(e) => errors.push(e.to_string()),
            }

            restricted_paths = robots_outcome.restricted_paths.clone();
            for path in &robots_outcome.allowed_paths {
                path_sources.entry(path.clone()).or_default().push(PathSource::RobotsAllowed);
            }
            for path in &restricted_paths {
                path_sources.entry(path.clone()).or_default().push(PathSource::RobotsDisallowed);
            }
            sitemap_references.extend(robots_outcome.sitemap_references);
        }
        Err(_) => {
            warnings.push(format!("discovery timed out after {}s", overall_timeout.as_secs()));
        }
    }

    let mut all_paths: Vec<String> = path_sources.keys().cloned().collect();
    all_paths.sort();
    all_paths.dedup();

    navigation_paths.sort();
    navigation_paths.dedup();
    content_paths.sort();
    content_paths.dedup();
    restricted_paths.sort();
    restricted_paths.dedup();
    sitemap_references.sort();
    sitemap_references.dedup();

    DiscoveryResult {
        canonical_url,
        all_paths,
        navigation_paths,
        content_paths,
        restricted_paths,
        sitemap_references,
        path_sources,
        errors,
        warnings,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    }
}

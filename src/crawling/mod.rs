//! Crawling phase: fetches selected paths concurrently and
//! produces one aggregated text blob.

mod aggregate;
mod extractors;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::config::PipelineConfig;
use crate::http_client::HttpFetcher;
use crate::types::{BatchCrawlResult, ExtractionMethod, PageCrawlResult};

const CRAWL_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const POLITENESS_DELAY: Duration = Duration::from_millis(500);
const TRUNCATION_MARKER: &str = "... [TRUNCATED]";

pub async fn crawl(
    fetcher: Arc<dyn HttpFetcher>,
    base_url: &str,
    selected_paths: &[String],
    config: &PipelineConfig,
) -> BatchCrawlResult {
    let started = Instant::now();
    let semaphore = Arc::new(Semaphore::new(config.crawl_max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for path in selected_paths.iter().cloned() {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        let base_url = base_url.to_string();
        let per_page_timeout = Duration::from_secs(config.crawl_per_page_timeout_secs);
        let max_content = config.crawl_max_content_per_page;

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            tokio::time::sleep(POLITENESS_DELAY).await;
            crawl_one_page(fetcher.as_ref(), &base_url, &path, per_page_timeout, max_content).await
        });
    }

    let mut page_results = Vec::with_capacity(selected_paths.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => page_results.push(result),
            Err(join_error) => page_results.push(PageCrawlResult {
                url: String::new(),
                success: false,
                content: String::new(),
                title: None,
                content_length: 0,
                elapsed_seconds: 0.0,
                extraction_method: ExtractionMethod::None,
                error: Some(format!("crawl task panicked: {join_error}")),
            }),
        }
    }

    let successful_pages = page_results.iter().filter(|p| p.success).count();
    let failed_pages = page_results.len() - successful_pages;
    let total_content_length = page_results.iter().map(|p| p.content_length).sum();
    let errors = page_results
        .iter()
        .filter_map(|p| p.error.clone().map(|e| format!("{}: {e}", p.url)))
        .collect();

    let aggregated_content = aggregate::aggregate(base_url, &page_results);

    BatchCrawlResult {
        base_url: base_url.to_string(),
        total_pages: page_results.len(),
        successful_pages,
        failed_pages,
        total_content_length,
        total_elapsed_seconds: started.elapsed().as_secs_f64(),
        aggregated_content,
        page_results,
        errors,
    }
}

async fn crawl_one_page(
    fetcher: &dyn HttpFetcher,
    base_url: &str,
    path: &str,
    per_page_timeout: Duration,
    max_content_per_page: usize,
) -> PageCrawlResult {
    let started = Instant::now();
    let url = resolve_path(base_url, path);

    let primary = fetcher.fetch(&url, per_page_timeout, CRAWL_USER_AGENT).await;

    let (body, fetched_via_secondary, fetch_failed) = match &primary {
        Ok(response) => (Some(response.body.clone()), false, false),
        Err(_) => (None, false, true),
    };

    let (content, method, title) = match &body {
        Some(html) => {
            let extracted = extractors::extract_content(html);
            let method = if extracted.used_fallback {
                ExtractionMethod::Fallback
            } else {
                ExtractionMethod::Primary
            };
            (extracted.text, method, extractors::extract_title(html))
        }
        None => (String::new(), ExtractionMethod::None, None),
    };

    // Both extractors effectively failed (no body at all) and the primary
    // fetch itself failed — try the secondary (rendered) fetcher once
    // before giving up.
    if content.is_empty() && fetch_failed {
        if let Ok(rendered) = fetcher.fetch_rendered(&url, per_page_timeout, CRAWL_USER_AGENT).await {
            let extracted = extractors::extract_content(&rendered.body);
            let method = if extracted.used_fallback {
                ExtractionMethod::Fallback
            } else {
                ExtractionMethod::Primary
            };
            return finish_page(url, extracted.text, method, extractors::extract_title(&rendered.body), started, max_content_per_page, None);
        }
        return PageCrawlResult {
            url,
            success: false,
            content: String::new(),
            title: None,
            content_length: 0,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            extraction_method: ExtractionMethod::None,
            error: primary.err().map(|e| e.to_string()),
        };
    }

    let _ = fetched_via_secondary;
    finish_page(url, content, method, title, started, max_content_per_page, None)
}

fn finish_page(
    url: String,
    mut content: String,
    method: ExtractionMethod,
    title: Option<String>,
    started: Instant,
    max_content_per_page: usize,
    error: Option<String>,
) -> PageCrawlResult {
    let success = !content.is_empty();
    if content.len() > max_content_per_page {
        let cut = content
            .char_indices()
            .take_while(|(i, _)| *i < max_content_per_page)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        content.truncate(cut);
        content.push_str(TRUNCATION_MARKER);
    }
    let content_length = content.len();

    PageCrawlResult {
        url,
        success,
        content,
        title,
        content_length,
        elapsed_seconds: started.elapsed().as_secs_f64(),
        extraction_method: method,
        error,
    }
}

fn resolve_path(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    match Url::parse(base_url).and_then(|b| b.join(path)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", base_url.trim_end_matches('/'), path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_path_against_base() {
        assert_eq!(resolve_path("https://example.com", "/about"), "https://example.com/about");
    }

    #[test]
    fn keeps_absolute_path_unchanged() {
        assert_eq!(
            resolve_path("https://example.com", "https://other.com/x"),
            "https://other.com/x"
        );
    }
}

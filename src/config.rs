//! Tunable parameters for the pipeline and batch orchestrator.
//!
//! Follows `CrawlConfig`'s `Default` + fluent `with_*` shape: all fields
//! have sane defaults baked in, and every knob is reachable via a
//! `#[must_use]` builder method rather than public field mutation.

/// Per-company pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub(crate) discovery_timeout_secs: u64,
    pub(crate) discovery_large_site_threshold: usize,
    pub(crate) user_agent_filter: String,

    pub(crate) selection_timeout_secs: u64,
    pub(crate) selection_min_confidence: f64,
    pub(crate) selection_max_pages: usize,
    pub(crate) selection_min_paths_for_retry: usize,
    pub(crate) selection_retry_confidence: f64,

    pub(crate) crawl_per_page_timeout_secs: u64,
    pub(crate) crawl_max_content_per_page: usize,
    pub(crate) crawl_max_concurrent: usize,

    pub(crate) extraction_timeout_secs: u64,
    pub(crate) extraction_content_cap: usize,

    pub(crate) raw_content_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            discovery_timeout_secs: 60,
            discovery_large_site_threshold: 500,
            user_agent_filter: "*".to_string(),

            selection_timeout_secs: 60,
            selection_min_confidence: 0.6,
            selection_max_pages: 50,
            selection_min_paths_for_retry: 8,
            selection_retry_confidence: 0.3,

            crawl_per_page_timeout_secs: 30,
            crawl_max_content_per_page: 10_000,
            crawl_max_concurrent: 10,

            extraction_timeout_secs: 120,
            extraction_content_cap: 80_000,

            raw_content_cap: crate::types::RAW_CONTENT_CAP,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_discovery_timeout_secs(mut self, secs: u64) -> Self {
        self.discovery_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_selection_timeout_secs(mut self, secs: u64) -> Self {
        self.selection_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_selection_min_confidence(mut self, confidence: f64) -> Self {
        self.selection_min_confidence = confidence;
        self
    }

    #[must_use]
    pub fn with_selection_max_pages(mut self, max_pages: usize) -> Self {
        self.selection_max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn with_crawl_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.crawl_max_concurrent = max_concurrent;
        self
    }

    #[must_use]
    pub fn with_crawl_per_page_timeout_secs(mut self, secs: u64) -> Self {
        self.crawl_per_page_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_extraction_timeout_secs(mut self, secs: u64) -> Self {
        self.extraction_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_extraction_content_cap(mut self, cap: usize) -> Self {
        self.extraction_content_cap = cap;
        self
    }
}

/// Batch orchestrator configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub(crate) max_concurrent_companies: usize,
    pub(crate) enable_resource_pooling: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_companies: 3,
            enable_resource_pooling: true,
        }
    }
}

impl BatchConfig {
    #[must_use]
    pub fn with_max_concurrent_companies(mut self, n: usize) -> Self {
        self.max_concurrent_companies = n;
        self
    }

    #[must_use]
    pub fn with_resource_pooling(mut self, enabled: bool) -> Self {
        self.enable_resource_pooling = enabled;
        self
    }
}

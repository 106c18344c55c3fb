//! Error taxonomy for the extraction pipeline.
//!
//! Phases never raise to their caller: each phase
//! returns a structured result with `success = false` and a human-readable
//! `error` string. The enums here are the internal vocabulary used by the
//! external-collaborator traits ([`crate::http_client::HttpFetcher`],
//! [`crate::llm::LlmClient`]) and by the phase implementations before they are
//! flattened into those `error: Option<String>` fields.

use thiserror::Error;

/// Failures from the HTTP fetcher collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("transport error fetching {url}: {detail}")]
    Transport { url: String, detail: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failures specific to Discovery sub-discoveries.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("navigation discovery failed: {0}")]
    Navigation(String),

    #[error("sitemap discovery failed: {0}")]
    Sitemap(String),

    #[error("robots.txt discovery failed: {0}")]
    Robots(String),

    #[error("discovery timed out after {0}s")]
    Timeout(u64),
}

/// Failures from the Selection phase's LLM round-trip.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("selection LLM call failed: {0}")]
    LlmCall(String),

    #[error("could not parse a selected-paths JSON object or array from the model response")]
    UnparsableResponse,

    #[error("selection timed out after {0}s")]
    Timeout(u64),
}

/// Failures from the Extraction phase's LLM round-trip.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction LLM call failed: {0}")]
    LlmCall(String),

    #[error("could not locate a JSON object in the model response")]
    UnparsableResponse,

    #[error("extraction timed out after {0}s")]
    Timeout(u64),
}

/// Programmer errors: the only errors the public API may actually raise.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("company name must not be empty")]
    EmptyCompanyName,

    #[error("homepage URL could not be parsed: {0}")]
    InvalidHomepageUrl(String),
}

//! The HTTP fetcher contract: given a URL, timeout and
//! user-agent, return status + body + final URL after redirects, or an
//! error. The crate ships one default implementation (`ReqwestFetcher`)
//! and the pipeline is generic over any `Arc<dyn HttpFetcher>`.
//!
//! `fetch_rendered` is the same "give me this URL's DOM" request as `fetch`,
//! differing only in effort: a caller who wires a headless-browser backend
//! gets Discovery's menu-toggle expansion and Crawling's anti-bot secondary
//! fetch "for free" through this one seam. The default fetcher treats it
//! identically to a plain fetch, which is the correct default given the
//! crate's non-goal of JS rendering.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::FetchError;

/// Successful HTTP response body plus metadata needed downstream.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    pub final_url: String,
}

/// Result of a HEAD probe (used by Discovery's canonicalization step).
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub status: u16,
    pub final_url: String,
}

pub trait HttpFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
        user_agent: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>>;

    fn fetch_rendered<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
        user_agent: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>> {
        self.fetch(url, timeout, user_agent)
    }

    fn head<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<HeadResponse, FetchError>> + Send + 'a>>;
}

/// Default `HttpFetcher`, backed by `reqwest`.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self {
            client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl ReqwestFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpFetcher for ReqwestFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
        user_agent: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .timeout(timeout)
                .header(reqwest::header::USER_AGENT, user_agent)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        FetchError::Timeout {
                            url: url.to_string(),
                            timeout_secs: timeout.as_secs(),
                        }
                    } else {
                        FetchError::Transport {
                            url: url.to_string(),
                            detail: e.to_string(),
                        }
                    }
                })?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            if !response.status().is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let body = response.text().await.map_err(|e| FetchError::Transport {
                url: url.to_string(),
                detail: e.to_string(),
            })?;

            Ok(FetchResponse {
                status,
                body,
                final_url,
            })
        })
    }

    fn head<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<HeadResponse, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .head(url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        FetchError::Timeout {
                            url: url.to_string(),
                            timeout_secs: timeout.as_secs(),
                        }
                    } else {
                        FetchError::Transport {
                            url: url.to_string(),
                            detail: e.to_string(),
                        }
                    }
                })?;

            Ok(HeadResponse {
                status: response.status().as_u16(),
                final_url: response.url().to_string(),
            })
        })
    }
}

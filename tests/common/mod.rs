use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use companyintel::http_client::{FetchResponse, HeadResponse, HttpFetcher};
use companyintel::{LlmClient, LlmResponse};
use companyintel::error::FetchError;

/// Canned HTTP responses keyed by exact URL. Unregistered URLs fail with a
/// 404-equivalent status error, which is enough to exercise Discovery's and
/// Crawling's failure-isolation paths without a real network.
pub struct FakeHttpFetcher {
    responses: HashMap<String, String>,
    heads: HashMap<String, u16>,
    delay: Option<Duration>,
}

impl FakeHttpFetcher {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            heads: HashMap::new(),
            delay: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    #[must_use]
    pub fn with_head_ok(mut self, url: impl Into<String>) -> Self {
        self.heads.insert(url.into(), 200);
        self
    }

    /// Every `fetch` sleeps this long before resolving — used to exercise
    /// the overall discovery timeout deterministically.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl HttpFetcher for FakeHttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        _timeout: Duration,
        _user_agent: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>> {
        let result = self.responses.get(url).cloned();
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match result {
                Some(body) => Ok(FetchResponse {
                    status: 200,
                    body,
                    final_url: url.to_string(),
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        })
    }

    fn head<'a>(
        &'a self,
        url: &'a str,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<HeadResponse, FetchError>> + Send + 'a>> {
        let status = self.heads.get(url).copied();
        Box::pin(async move {
            match status {
                Some(status) => Ok(HeadResponse {
                    status,
                    final_url: url.to_string(),
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        })
    }
}

/// Scripted LLM responses, consumed in call order. Exhausting the script
/// yields a failure response, exercising the deterministic-fallback paths.
pub struct FakeLlmClient {
    scripted: Mutex<VecDeque<LlmResponse>>,
}

impl FakeLlmClient {
    pub fn new(scripted: Vec<LlmResponse>) -> Self {
        Self {
            scripted: Mutex::new(scripted.into()),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }
}

impl LlmClient for FakeLlmClient {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
        model: &'a str,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = LlmResponse> + Send + 'a>> {
        let next = self.scripted.lock().unwrap().pop_front();
        let model = model.to_string();
        Box::pin(async move { next.unwrap_or_else(|| LlmResponse::failure(model, "no scripted response left")) })
    }
}

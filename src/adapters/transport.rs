// src/adapters/transport.rs
//! HTTP seam used by the adapters: a reqwest-backed client for real calls and a
//! scripted fixture transport for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{RankerError, Result};

/// A GET request as the adapters describe it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: &serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, req: &HttpRequest) -> Result<HttpResponse>;
}

/// Real transport. The per-request timeout is the only deadline a fetch has.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("post-ranker/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| RankerError::Network(format!("building http client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, req: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.http.get(&req.url).query(&req.query);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Replays scripted responses in order and records every request.
///
/// With [`FixtureTransport::repeating`] the last response is served forever,
/// which models an upstream that never stops handing out cursors.
#[derive(Default)]
pub struct FixtureTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    repeat_last: bool,
}

impl FixtureTransport {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            repeat_last: false,
        }
    }

    pub fn repeating(response: HttpResponse) -> Self {
        Self {
            repeat_last: true,
            ..Self::new([response])
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl HttpTransport for FixtureTransport {
    async fn get(&self, req: &HttpRequest) -> Result<HttpResponse> {
        lock(&self.requests).push(req.clone());
        let mut queue = lock(&self.responses);
        let next = if self.repeat_last && queue.len() == 1 {
            queue.front().cloned()
        } else {
            queue.pop_front()
        };
        next.ok_or_else(|| RankerError::Network(format!("no scripted response for {}", req.url)))
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_replays_in_order_then_runs_dry() {
        let t = FixtureTransport::new([
            HttpResponse {
                status: 200,
                body: "1".into(),
            },
            HttpResponse {
                status: 404,
                body: "2".into(),
            },
        ]);
        let req = HttpRequest::get("https://example.test/a").query("q", "v");
        assert_eq!(t.get(&req).await.unwrap().body, "1");
        assert_eq!(t.get(&req).await.unwrap().status, 404);
        assert!(matches!(t.get(&req).await, Err(RankerError::Network(_))));
        assert_eq!(t.request_count(), 3);
        assert_eq!(t.requests()[0].query_value("q"), Some("v"));
    }

    #[tokio::test]
    async fn repeating_fixture_never_runs_dry() {
        let t = FixtureTransport::repeating(HttpResponse {
            status: 200,
            body: "x".into(),
        });
        let req = HttpRequest::get("https://example.test");
        for _ in 0..5 {
            assert_eq!(t.get(&req).await.unwrap().body, "x");
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest::get("u").header("X-RapidAPI-Key", "k");
        assert_eq!(req.header_value("x-rapidapi-key"), Some("k"));
        assert_eq!(req.header_value("missing"), None);
    }
}

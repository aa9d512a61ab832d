// src/adapters/twitter_api.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::transport::{HttpRequest, HttpTransport};
use super::{
    ensure_metrics_described, json_body, require_list_timeline, upstream_error, PlatformAdapter,
};
use crate::config::SourceType;
use crate::error::{RankerError, Result};
use crate::post::{status_url, Post};

pub const TWITTER_API_HOST: &str = "api.twitter.com";

/// The list tweets endpoint accepts 1..=100 results per call.
const MAX_RESULTS_CAP: usize = 100;

#[derive(Debug, Deserialize)]
struct ListTweetsResponse {
    #[serde(default)]
    data: Vec<ApiTweet>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    created_at: DateTime<Utc>,
    public_metrics: PublicMetrics,
}

#[derive(Debug, Deserialize)]
struct PublicMetrics {
    like_count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    username: String,
}

/// Direct Twitter API v2 client: one bearer-authenticated request per fetch.
pub struct TwitterApiAdapter {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    base_url: String,
}

impl TwitterApiAdapter {
    /// `api_host` defaults to api.twitter.com.
    pub fn new(
        api_key: &str,
        api_host: Option<&str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RankerError::Config("Twitter API key not provided".into()));
        }
        let host = api_host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(TWITTER_API_HOST);
        Ok(Self {
            transport,
            api_key: api_key.to_string(),
            base_url: format!("https://{host}"),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn to_posts(resp: ListTweetsResponse) -> Result<Vec<Post>> {
        let usernames: HashMap<&str, &str> = resp
            .includes
            .users
            .iter()
            .map(|u| (u.id.as_str(), u.username.as_str()))
            .collect();

        resp.data
            .iter()
            .map(|t| {
                let author_id = t.author_id.as_deref().unwrap_or_default();
                let author = usernames.get(author_id).copied().unwrap_or(author_id);
                Post::new(
                    t.id.as_str(),
                    t.text.as_str(),
                    author,
                    status_url(author, &t.id),
                    t.public_metrics.like_count,
                    t.created_at,
                )
            })
            .collect()
    }

    async fn fetch_page(&self, max_posts: usize, source_id: &str) -> Result<Vec<Post>> {
        let req = HttpRequest::get(format!("{}/2/lists/{}/tweets", self.base_url, source_id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query("max_results", max_posts.clamp(1, MAX_RESULTS_CAP).to_string())
            .query("tweet.fields", "created_at,public_metrics,author_id")
            .query("expansions", "author_id")
            .query("user.fields", "username");

        let t0 = std::time::Instant::now();
        let body = json_body(self.transport.get(&req).await?)?;
        counter!("fetch_pages_total", "adapter" => self.name()).increment(1);

        let fields = ["detail", "message", "title"];
        if let Some(msg) = upstream_error(&body, &fields, "Unknown Twitter API error") {
            return Err(RankerError::Upstream(format!("Twitter API error: {msg}")));
        }

        let parsed: ListTweetsResponse = serde_json::from_value(body)
            .map_err(|e| RankerError::Parse(format!("unexpected list tweets shape: {e}")))?;
        let mut posts = Self::to_posts(parsed)?;
        posts.truncate(max_posts);

        histogram!("fetch_page_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(posts)
    }
}

#[async_trait]
impl PlatformAdapter for TwitterApiAdapter {
    async fn fetch_posts(
        &self,
        max_posts: usize,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<Post>> {
        ensure_metrics_described();
        require_list_timeline(self.name(), source_type)?;
        tracing::info!(adapter = self.name(), source_id, max_posts, "fetching list tweets");

        match self.fetch_page(max_posts, source_id).await {
            Ok(posts) => {
                counter!("fetch_posts_total", "adapter" => self.name())
                    .increment(posts.len() as u64);
                tracing::info!(adapter = self.name(), count = posts.len(), "fetched posts");
                Ok(posts)
            }
            Err(e) => {
                tracing::warn!(error = %e, adapter = self.name(), "fetch failed");
                counter!("fetch_errors_total", "adapter" => self.name()).increment(1);
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "twitter-api"
    }
}

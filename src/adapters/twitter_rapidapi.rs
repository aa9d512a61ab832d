// src/adapters/twitter_rapidapi.rs
//! RapidAPI "twitter241" proxy. Paginates a list timeline with `cursor.bottom`
//! and tolerates individual entries that don't carry a tweet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::transport::{HttpRequest, HttpTransport};
use super::{
    ensure_metrics_described, json_body, require_list_timeline, upstream_error, PlatformAdapter,
};
use crate::config::source::DEFAULT_MAX_PAGES;
use crate::config::SourceType;
use crate::error::{RankerError, Result};
use crate::post::{status_url, Post};

pub const RAPIDAPI_HOST: &str = "twitter241.p.rapidapi.com";

/// `created_at` layout used by the legacy tweet object, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const LEGACY_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const ENTRIES_POINTER: &str = "/result/timeline/instructions/0/entries";
const LEGACY_POINTER: &str = "/content/itemContent/tweet_results/result/legacy";

#[derive(Debug, Deserialize)]
struct LegacyTweet {
    id_str: String,
    full_text: String,
    user_id_str: String,
    favorite_count: u64,
    created_at: String,
}

pub fn parse_legacy_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(ts, LEGACY_TIMESTAMP_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RankerError::Parse(format!("bad created_at {ts:?}: {e}")))
}

/// One decoded page: the posts it yielded, how many entries were skipped, and the next cursor.
#[derive(Debug)]
pub struct Page {
    pub posts: Vec<Post>,
    pub dropped: usize,
    pub next_cursor: Option<String>,
}

/// Decode a list-timeline body. Only the top-level shape is mandatory.
pub fn parse_page(body: &Value) -> Result<Page> {
    if let Some(msg) = upstream_error(body, &["message"], "Unknown API error") {
        return Err(RankerError::Upstream(format!("RapidAPI Twitter241 error: {msg}")));
    }

    let entries = body
        .pointer(ENTRIES_POINTER)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            RankerError::Parse("missing result.timeline.instructions[0].entries".into())
        })?;

    let mut posts = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    for entry in entries {
        match entry_to_post(entry) {
            Some(p) => posts.push(p),
            None => dropped += 1,
        }
    }

    let next_cursor = body
        .pointer("/cursor/bottom")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(Page {
        posts,
        dropped,
        next_cursor,
    })
}

fn entry_to_post(entry: &Value) -> Option<Post> {
    let entry_id = entry.get("entryId").and_then(Value::as_str).unwrap_or("?");
    let legacy = entry.pointer(LEGACY_POINTER)?;
    let tweet: LegacyTweet = match LegacyTweet::deserialize(legacy) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(entry_id, error = %e, "dropping entry with malformed legacy tweet");
            return None;
        }
    };
    let created_at = match parse_legacy_timestamp(&tweet.created_at) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::debug!(entry_id, error = %e, "dropping entry");
            return None;
        }
    };
    Post::new(
        tweet.id_str.as_str(),
        tweet.full_text,
        tweet.user_id_str.as_str(),
        status_url(&tweet.user_id_str, &tweet.id_str),
        tweet.favorite_count,
        created_at,
    )
    .ok()
}

/// Paginated list-timeline client behind the RapidAPI proxy.
pub struct TwitterRapidApiAdapter {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    api_host: String,
    base_url: String,
    max_pages: usize,
}

impl TwitterRapidApiAdapter {
    pub fn new(api_key: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RankerError::Config("RapidAPI key not provided".into()));
        }
        Ok(Self {
            transport,
            api_key: api_key.to_string(),
            api_host: RAPIDAPI_HOST.to_string(),
            base_url: format!("https://{RAPIDAPI_HOST}"),
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Caps requests per fetch; an upstream that always hands out a cursor stops here.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    async fn fetch_page(&self, source_id: &str, cursor: Option<&str>) -> Result<Page> {
        let mut req = HttpRequest::get(format!("{}/list-timeline", self.base_url))
            .header("X-RapidAPI-Key", self.api_key.as_str())
            .header("X-RapidAPI-Host", self.api_host.as_str())
            .query("listId", source_id);
        if let Some(c) = cursor {
            req = req.query("cursor", c);
        }

        let t0 = std::time::Instant::now();
        let body = json_body(self.transport.get(&req).await?)?;
        let page = parse_page(&body)?;
        histogram!("fetch_page_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("fetch_pages_total", "adapter" => self.name()).increment(1);
        if page.dropped > 0 {
            counter!("fetch_entries_dropped_total", "adapter" => self.name())
                .increment(page.dropped as u64);
        }
        Ok(page)
    }

    async fn collect(&self, max_posts: usize, source_id: &str) -> Result<Vec<Post>> {
        let mut all: Vec<Post> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(source_id, cursor.as_deref()).await?;
            pages += 1;
            tracing::debug!(
                page = pages,
                posts = page.posts.len(),
                dropped = page.dropped,
                has_cursor = page.next_cursor.is_some(),
                "list timeline page"
            );
            all.extend(page.posts);

            if all.len() >= max_posts {
                all.truncate(max_posts);
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
            if pages >= self.max_pages {
                tracing::warn!(
                    pages,
                    collected = all.len(),
                    max_posts,
                    "page cap reached before max_posts; returning partial timeline"
                );
                break;
            }
        }

        Ok(all)
    }
}

#[async_trait]
impl PlatformAdapter for TwitterRapidApiAdapter {
    async fn fetch_posts(
        &self,
        max_posts: usize,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<Post>> {
        ensure_metrics_described();
        require_list_timeline(self.name(), source_type)?;
        tracing::info!(adapter = self.name(), source_id, max_posts, "fetching list timeline");

        match self.collect(max_posts, source_id).await {
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
        "twitter-rapidapi"
    }
}

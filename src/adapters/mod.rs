// src/adapters/mod.rs
pub mod transport;
pub mod twitter_api;
pub mod twitter_rapidapi;

use async_trait::async_trait;
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::SourceType;
use crate::error::{RankerError, Result};
use crate::post::Post;
use transport::HttpResponse;

pub use transport::{FixtureTransport, HttpRequest, HttpTransport, ReqwestTransport};
pub use twitter_api::TwitterApiAdapter;
pub use twitter_rapidapi::TwitterRapidApiAdapter;

/// One API surface that can produce normalized posts for a source.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Returns at most `max_posts` posts in upstream order.
    async fn fetch_posts(
        &self,
        max_posts: usize,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<Post>>;

    fn name(&self) -> &'static str;
}

/// One-time metrics registration (so series show up once a recorder is installed).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_pages_total", "HTTP pages fetched from upstream APIs.");
        describe_counter!("fetch_posts_total", "Posts returned by adapters.");
        describe_counter!(
            "fetch_entries_dropped_total",
            "Timeline entries skipped because they lacked the expected fields."
        );
        describe_counter!("fetch_errors_total", "Fetches aborted by an error.");
        describe_histogram!(
            "fetch_page_ms",
            "Round trip plus parse time per page in milliseconds."
        );
    });
}

/// Non-2xx becomes a network error; the body must be JSON.
pub(crate) fn json_body(resp: HttpResponse) -> Result<Value> {
    if !(200..300).contains(&resp.status) {
        return Err(RankerError::Network(format!(
            "HTTP {}: {}",
            resp.status,
            excerpt(&resp.body, 200)
        )));
    }
    serde_json::from_str(&resp.body)
        .map_err(|e| RankerError::Parse(format!("response is not JSON: {e}")))
}

/// First message of a non-empty top-level `errors` array, trying `fields` in order.
pub(crate) fn upstream_error(body: &Value, fields: &[&str], fallback: &str) -> Option<String> {
    let first = body.get("errors")?.as_array()?.first()?;
    let msg = fields
        .iter()
        .find_map(|f| first.get(*f).and_then(Value::as_str))
        .unwrap_or(fallback);
    Some(msg.to_string())
}

pub(crate) fn require_list_timeline(adapter: &str, source_type: SourceType) -> Result<()> {
    if source_type != SourceType::ListTimeline {
        return Err(RankerError::Config(format!(
            "{adapter} only supports list_timeline, got {source_type}"
        )));
    }
    Ok(())
}

fn excerpt(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

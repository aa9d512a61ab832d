// tests/common/mod.rs
// Builders for RapidAPI list-timeline pages so pagination tests don't need huge fixtures.
#![allow(dead_code)]

use post_ranker::adapters::transport::HttpResponse;
use serde_json::{json, Value};

pub const RAPIDAPI_HOST: &str = "twitter241.p.rapidapi.com";

pub fn legacy_entry(id: u64, likes: u64) -> Value {
    json!({
        "entryId": format!("tweet-{id}"),
        "content": {
            "entryType": "TimelineTimelineItem",
            "itemContent": {
                "itemType": "TimelineTweet",
                "tweet_results": {"result": {"__typename": "Tweet", "legacy": {
                    "id_str": id.to_string(),
                    "full_text": format!("post {id}"),
                    "user_id_str": "4242",
                    "favorite_count": likes,
                    "created_at": "Tue Oct 15 08:00:00 +0000 2024"
                }}}
            }
        }
    })
}

/// A page with ids `first_id..first_id + count`; likes cycle so ties exist.
pub fn page(first_id: u64, count: u64, cursor: Option<&str>) -> Value {
    let entries: Vec<Value> = (first_id..first_id + count)
        .map(|id| legacy_entry(id, id % 7))
        .collect();
    let mut body = json!({
        "result": {"timeline": {"instructions": [
            {"type": "TimelineAddEntries", "entries": entries}
        ]}}
    });
    if let Some(c) = cursor {
        body["cursor"] = json!({"bottom": c, "top": "top-cursor"});
    }
    body
}

pub fn ok(body: &Value) -> HttpResponse {
    HttpResponse::ok_json(body)
}

pub fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let raw = std::fs::read_to_string(&path).expect("read fixture");
    serde_json::from_str(&raw).expect("fixture is json")
}

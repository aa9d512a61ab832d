// tests/fixtures_parsing.rs
//
// Recorded-shape fixtures for both Twitter adapters.

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{fixture, ok, RAPIDAPI_HOST};
use post_ranker::adapters::FixtureTransport;
use post_ranker::{PostRanker, SourceConfig, SourceType};

#[tokio::test]
async fn rapidapi_page_skips_entries_without_legacy() {
    let transport = Arc::new(FixtureTransport::new([ok(&fixture("rapidapi_list_page.json"))]));
    let cfg = SourceConfig::new("Twitter", SourceType::ListTimeline, "99", "k")
        .with_api_hostname(RAPIDAPI_HOST);
    let ranker = PostRanker::with_transport(cfg, transport.clone()).unwrap();

    let posts = ranker.fetch_timeline().await.expect("partial entries tolerated");
    assert_eq!(posts.len(), 8, "2 of 10 entries lack `legacy`");
    assert_eq!(transport.request_count(), 1, "fixture has no bottom cursor");

    assert!(posts.iter().all(|p| !p.id().is_empty() && !p.url().is_empty()));
    let first = &posts[0];
    assert_eq!(first.id(), "1850000000000000000");
    assert_eq!(first.author(), "4400");
    assert_eq!(first.url(), "https://twitter.com/4400/status/1850000000000000000");
    assert_eq!(first.content(), "post number 0");
    assert_eq!(
        first.created_at(),
        Utc.with_ymd_and_hms(2024, 10, 10, 20, 19, 0).unwrap()
    );

    let top: Vec<u64> = PostRanker::rank_by_likes(&posts)
        .iter()
        .take(3)
        .map(|p| p.likes())
        .collect();
    assert_eq!(top, vec![1500, 340, 89]);
}

#[tokio::test]
async fn twitter_v2_list_maps_and_ranks() {
    let transport = Arc::new(FixtureTransport::new([ok(&fixture("twitter_v2_list.json"))]));
    let list_id = "1847432246933762439";
    let cfg = SourceConfig::new("twitter", SourceType::ListTimeline, list_id, "bearer");
    let ranker = PostRanker::with_transport(cfg, transport.clone()).unwrap();
    assert_eq!(ranker.adapter_name(), "twitter-api");

    let top = ranker.top(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].author(), "tokio_rs");
    assert_eq!(top[0].likes(), 310);
    // tie at 42 likes: the earlier upstream item wins
    assert_eq!(top[1].id(), "1846000000000000001");
    assert_eq!(top[1].url(), "https://twitter.com/rustlang/status/1846000000000000001");

    let req = &transport.requests()[0];
    assert_eq!(req.url, "https://api.twitter.com/2/lists/1847432246933762439/tweets");
    assert_eq!(req.query_value("tweet.fields"), Some("created_at,public_metrics,author_id"));
    assert_eq!(req.query_value("max_results"), Some("100"));
}

// tests/ranker_properties.rs
//
// Ranking invariants over generated inputs plus the factory's platform rules.

use std::collections::HashMap;

use chrono::Utc;
use post_ranker::factory::create_adapter_with_transport;
use post_ranker::adapters::FixtureTransport;
use post_ranker::{create_adapter, Post, PostRanker, RankerError, SourceConfig, SourceType};
use std::sync::Arc;

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn generated(seed: u64, len: usize, like_range: u64) -> Vec<Post> {
    let mut rng = Lcg(seed);
    (0..len)
        .map(|i| {
            let id = format!("p{i}");
            let url = format!("https://twitter.com/u/status/{i}");
            Post::new(id, "text", "u", url, rng.next() % like_range, Utc::now()).unwrap()
        })
        .collect()
}

#[test]
fn rank_by_likes_is_sorted_stable_permutation() {
    for seed in 1..=25u64 {
        let len = (seed as usize * 7) % 60 + 1;
        let input = generated(seed, len, 5);
        let ranked = PostRanker::rank_by_likes(&input);

        assert_eq!(ranked.len(), input.len());
        assert!(ranked.windows(2).all(|w| w[0].likes() >= w[1].likes()), "seed {seed}");

        let mut want: Vec<_> = input.iter().map(|p| p.id().to_string()).collect();
        let mut got: Vec<_> = ranked.iter().map(|p| p.id().to_string()).collect();
        want.sort();
        got.sort();
        assert_eq!(want, got, "seed {seed}: not a permutation");

        let position: HashMap<&str, usize> =
            input.iter().enumerate().map(|(i, p)| (p.id(), i)).collect();
        for w in ranked.windows(2) {
            if w[0].likes() == w[1].likes() {
                assert!(position[w[0].id()] < position[w[1].id()], "seed {seed}: unstable tie");
            }
        }
    }
}

#[test]
fn unrecognized_platforms_yield_no_adapter_and_no_ranker() {
    for name in ["facebook", "LinkedIn", "twit", "twitter2"] {
        let cfg = SourceConfig::new(name, SourceType::ListTimeline, "1", "k");
        assert!(create_adapter(&cfg).unwrap().is_none(), "{name}");
        let transport = Arc::new(FixtureTransport::default());
        assert!(create_adapter_with_transport(&cfg, transport).unwrap().is_none());

        match PostRanker::new(cfg) {
            Err(RankerError::Config(msg)) => assert!(msg.contains("Unsupported platform")),
            Err(other) => panic!("{name}: wrong error {other:?}"),
            Ok(_) => panic!("{name}: ranker should not be constructed"),
        }
    }
}

#[test]
fn platform_match_ignores_case() {
    for name in ["twitter", "Twitter", "TWITTER", " twitter "] {
        let cfg = SourceConfig::new(name, SourceType::ListTimeline, "1", "k");
        assert!(PostRanker::new(cfg).is_ok(), "{name}");
    }
}

#[test]
fn invalid_config_fails_before_adapter_selection() {
    let cfg = SourceConfig::new("twitter", SourceType::ListTimeline, "1", "k").with_max_posts(0);
    assert!(matches!(PostRanker::new(cfg), Err(RankerError::Config(_))));
}

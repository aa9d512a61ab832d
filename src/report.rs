// src/report.rs
use std::fmt::Write as _;

use crate::post::Post;

/// Human-readable ranking, one `{rank}. {url} {likes} likes` line per post.
pub fn render_text(posts: &[Post]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} posts. Top posts by likes:", posts.len());
    let _ = writeln!(out, "{}", "-".repeat(50));
    for (i, p) in posts.iter().enumerate() {
        let _ = writeln!(out, "{}. {} {} likes", i + 1, p.url(), p.likes());
    }
    out
}

pub fn render_json(posts: &[Post]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(posts)
}

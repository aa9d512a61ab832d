// src/post.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RankerError, Result};

/// A post normalized from any platform. Fields are read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    id: String,
    content: String,
    author: String,
    url: String,
    likes: u64,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Build a post; `id` and `url` must be non-empty.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u64,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let id = id.into();
        let url = url.into();
        if id.trim().is_empty() {
            return Err(RankerError::Parse("post id is empty".into()));
        }
        if url.trim().is_empty() {
            return Err(RankerError::Parse(format!("post {id} has an empty url")));
        }
        Ok(Self {
            id,
            content: content.into(),
            author: author.into(),
            url,
            likes,
            created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Canonical status link. Without an author the `i/web` form still resolves.
pub fn status_url(author: &str, id: &str) -> String {
    let author = author.trim();
    if author.is_empty() {
        format!("https://twitter.com/i/web/status/{id}")
    } else {
        format!("https://twitter.com/{author}/status/{id}")
    }
}

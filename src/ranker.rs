// src/ranker.rs
//! Ranking: fetch a source through its adapter, order by likes, keep the top N.

use std::sync::Arc;

use crate::adapters::{HttpTransport, PlatformAdapter};
use crate::config::SourceConfig;
use crate::error::{RankerError, Result};
use crate::factory::{create_adapter, create_adapter_with_transport};
use crate::post::Post;

pub const DEFAULT_TOP_LIMIT: usize = 10;

pub struct PostRanker {
    config: SourceConfig,
    adapter: Box<dyn PlatformAdapter>,
}

impl PostRanker {
    /// Fails with `Config` if the config is invalid or no adapter exists for the platform.
    pub fn new(config: SourceConfig) -> Result<Self> {
        config.validate()?;
        let adapter = create_adapter(&config)?;
        Self::from_selected(config, adapter)
    }

    pub fn with_transport(config: SourceConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        let adapter = create_adapter_with_transport(&config, transport)?;
        Self::from_selected(config, adapter)
    }

    /// Wraps an already-built adapter; the config is still validated.
    pub fn with_adapter(config: SourceConfig, adapter: Box<dyn PlatformAdapter>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, adapter })
    }

    fn from_selected(
        config: SourceConfig,
        adapter: Option<Box<dyn PlatformAdapter>>,
    ) -> Result<Self> {
        match adapter {
            Some(adapter) => Ok(Self { config, adapter }),
            None => Err(RankerError::Config(format!(
                "Unsupported platform: {}",
                config.platform_name
            ))),
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    /// Fetch the configured source; errors propagate unchanged.
    pub async fn fetch_timeline(&self) -> Result<Vec<Post>> {
        self.adapter
            .fetch_posts(
                self.config.max_posts,
                self.config.source_type,
                &self.config.source_id,
            )
            .await
    }

    /// New vector ordered by likes, highest first. Ties keep their input order.
    pub fn rank_by_likes(posts: &[Post]) -> Vec<Post> {
        let mut ranked = posts.to_vec();
        // `sort_by` is stable.
        ranked.sort_by(|a, b| b.likes().cmp(&a.likes()));
        ranked
    }

    /// Fetch, rank, and keep the first `min(n, len)` posts.
    pub async fn top(&self, n: usize) -> Result<Vec<Post>> {
        let posts = self.fetch_timeline().await?;
        let mut ranked = Self::rank_by_likes(&posts);
        ranked.truncate(n);
        tracing::info!(
            adapter = self.adapter.name(),
            fetched = posts.len(),
            returned = ranked.len(),
            "ranked posts by likes"
        );
        Ok(ranked)
    }
}

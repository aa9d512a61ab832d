// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod factory;
pub mod post;
pub mod ranker;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::adapters::PlatformAdapter;
pub use crate::config::{SourceConfig, SourceType};
pub use crate::error::{RankerError, Result};
pub use crate::factory::create_adapter;
pub use crate::post::Post;
pub use crate::ranker::{PostRanker, DEFAULT_TOP_LIMIT};

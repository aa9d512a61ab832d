// src/config/source.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};

use crate::adapters::twitter_rapidapi::RAPIDAPI_HOST;
use crate::error::{RankerError, Result};

pub const ENV_CONFIG_PATH: &str = "POST_RANKER_CONFIG";
pub const ENV_RAPIDAPI_KEY: &str = "RAPIDAPI_KEY";
pub const ENV_TWITTER_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";

pub const DEFAULT_MAX_POSTS: usize = 100;
pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_max_posts() -> usize {
    DEFAULT_MAX_POSTS
}
fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Which feed of a platform to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Timeline,
    UserTimeline,
    ListTimeline,
    SearchTimeline,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Timeline => "timeline",
            SourceType::UserTimeline => "user_timeline",
            SourceType::ListTimeline => "list_timeline",
            SourceType::SearchTimeline => "search_timeline",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = RankerError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "timeline" => Ok(SourceType::Timeline),
            "user_timeline" => Ok(SourceType::UserTimeline),
            "list_timeline" => Ok(SourceType::ListTimeline),
            "search_timeline" => Ok(SourceType::SearchTimeline),
            other => Err(RankerError::Config(format!("unknown source type: {other}"))),
        }
    }
}

/// Where to fetch from and with which credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// "twitter" (case-insensitive)
    #[serde(alias = "platform")]
    pub platform_name: String,
    pub source_type: SourceType,
    pub source_id: String,
    /// "ENV" means: read from RAPIDAPI_KEY / TWITTER_BEARER_TOKEN (by host)
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_hostname: Option<String>,
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,
    /// Upper bound on paginated requests per fetch.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn new(
        platform_name: impl Into<String>,
        source_type: SourceType,
        source_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            platform_name: platform_name.into(),
            source_type,
            source_id: source_id.into(),
            api_key: api_key.into(),
            api_hostname: None,
            max_posts: DEFAULT_MAX_POSTS,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_hostname(mut self, host: impl Into<String>) -> Self {
        self.api_hostname = Some(host.into());
        self
    }

    pub fn with_max_posts(mut self, max_posts: usize) -> Self {
        self.max_posts = max_posts;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.platform_name.trim().is_empty() {
            return Err(RankerError::Config("platform name is empty".into()));
        }
        if self.source_id.trim().is_empty() {
            return Err(RankerError::Config("source id is empty".into()));
        }
        if self.max_posts == 0 {
            return Err(RankerError::Config("max_posts must be > 0".into()));
        }
        if self.max_pages == 0 {
            return Err(RankerError::Config("max_pages must be > 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(RankerError::Config("timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    fn uses_rapidapi(&self) -> bool {
        self.api_hostname.as_deref() == Some(RAPIDAPI_HOST)
    }

    /// Replace an `api_key` of "ENV" with the matching environment variable.
    pub fn resolve_api_key(&mut self) -> Result<()> {
        if !self.api_key.trim().eq_ignore_ascii_case("env") {
            return Ok(());
        }
        let var = if self.uses_rapidapi() {
            ENV_RAPIDAPI_KEY
        } else {
            ENV_TWITTER_BEARER_TOKEN
        };
        self.api_key =
            env::var(var).map_err(|_| RankerError::Config(format!("Missing {var} env var")))?;
        Ok(())
    }

    /// Parse a TOML or JSON file (picked by extension) without resolving or validating.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RankerError::Config(format!("reading config from {}: {e}", path.display()))
        })?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
    }

    /// Load from TOML or JSON, resolve the key and validate.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut cfg = Self::read_file(path)?;
        cfg.resolve_api_key()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Config file discovery:
    /// 1) $POST_RANKER_CONFIG (must exist)
    /// 2) config/post_ranker.toml
    /// 3) config/post_ranker.json
    pub fn default_path() -> Result<Option<PathBuf>> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(RankerError::Config(format!(
                    "{ENV_CONFIG_PATH} points to non-existent path"
                )));
            }
            return Ok(Some(pb));
        }
        Ok(["config/post_ranker.toml", "config/post_ranker.json"]
            .into_iter()
            .map(PathBuf::from)
            .find(|pb| pb.exists()))
    }

    /// [`SourceConfig::load_from_file`] on the first path [`SourceConfig::default_path`] finds.
    pub fn load_default() -> Result<Option<Self>> {
        Self::default_path()?
            .map(|pb| Self::load_from_file(&pb))
            .transpose()
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<SourceConfig> {
    match hint_ext {
        "toml" => {
            toml::from_str(s).map_err(|e| RankerError::Config(format!("invalid toml: {e}")))
        }
        "json" => {
            serde_json::from_str(s).map_err(|e| RankerError::Config(format!("invalid json: {e}")))
        }
        _ => toml::from_str::<SourceConfig>(s)
            .or_else(|_| serde_json::from_str(s))
            .map_err(|_| RankerError::Config("unsupported config format".into())),
    }
}

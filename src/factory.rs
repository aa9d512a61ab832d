// src/factory.rs
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::twitter_rapidapi::RAPIDAPI_HOST;
use crate::adapters::{
    HttpTransport, PlatformAdapter, ReqwestTransport, TwitterApiAdapter, TwitterRapidApiAdapter,
};
use crate::config::SourceConfig;
use crate::error::Result;

/// Factory: build the adapter for `config.platform_name` over a real HTTP client.
///
/// * `Ok(None)` for an unknown platform (the caller decides how to fail).
/// * `Err(Config)` when the platform is known but its credentials are missing.
pub fn create_adapter(config: &SourceConfig) -> Result<Option<Box<dyn PlatformAdapter>>> {
    if !is_supported_platform(&config.platform_name) {
        return Ok(None);
    }
    let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
    create_adapter_with_transport(config, Arc::new(transport))
}

/// Same selection rules as [`create_adapter`], with an injected transport.
pub fn create_adapter_with_transport(
    config: &SourceConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Option<Box<dyn PlatformAdapter>>> {
    match config.platform_name.trim().to_ascii_lowercase().as_str() {
        "twitter" | "x" => {
            let adapter: Box<dyn PlatformAdapter> =
                if config.api_hostname.as_deref() == Some(RAPIDAPI_HOST) {
                    Box::new(
                        TwitterRapidApiAdapter::new(&config.api_key, transport)?
                            .with_max_pages(config.max_pages),
                    )
                } else {
                    Box::new(TwitterApiAdapter::new(
                        &config.api_key,
                        config.api_hostname.as_deref(),
                        transport,
                    )?)
                };
            Ok(Some(adapter))
        }
        _ => Ok(None),
    }
}

pub fn is_supported_platform(name: &str) -> bool {
    matches!(name.trim().to_ascii_lowercase().as_str(), "twitter" | "x")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixtureTransport;
    use crate::config::SourceType;
    use crate::error::RankerError;

    fn fixture() -> Arc<dyn HttpTransport> {
        Arc::new(FixtureTransport::default())
    }

    #[test]
    fn selects_variant_by_hostname() {
        let base = SourceConfig::new("TWITTER", SourceType::ListTimeline, "1", "k");

        let direct = create_adapter_with_transport(&base, fixture()).unwrap().unwrap();
        assert_eq!(direct.name(), "twitter-api");

        let other_host = base.clone().with_api_hostname("api.twitter.com");
        let direct = create_adapter_with_transport(&other_host, fixture()).unwrap().unwrap();
        assert_eq!(direct.name(), "twitter-api");

        let proxied = base.with_api_hostname(RAPIDAPI_HOST);
        let proxied = create_adapter_with_transport(&proxied, fixture()).unwrap().unwrap();
        assert_eq!(proxied.name(), "twitter-rapidapi");
    }

    #[test]
    fn unknown_platform_is_none_not_error() {
        for name in ["mastodon", "linkedin", ""] {
            let cfg = SourceConfig::new(name, SourceType::ListTimeline, "1", "k");
            assert!(create_adapter_with_transport(&cfg, fixture()).unwrap().is_none());
            assert!(create_adapter(&cfg).unwrap().is_none());
        }
    }

    #[test]
    fn missing_key_is_config_error() {
        let cfg = SourceConfig::new("twitter", SourceType::ListTimeline, "1", "")
            .with_api_hostname(RAPIDAPI_HOST);
        assert!(matches!(
            create_adapter_with_transport(&cfg, fixture()),
            Err(RankerError::Config(_))
        ));
    }
}

//! Typed config fetch over an `AssetFetcher`.

use roofer_core::{BrandingError, ClientConfig, ClientIdentifier};

use crate::fetcher::AssetFetcher;
use crate::retry::FallbackPolicy;

/// How config paths are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// `/configs/<id>.json`, resolved against the request origin.
    Absolute,
    /// `configs/<id>.json`, resolved against the page.
    Relative,
}

impl PathStyle {
    /// Config path for an identifier.
    pub fn path_for(&self, identifier: &ClientIdentifier) -> String {
        match self {
            Self::Absolute => identifier.asset_path(),
            Self::Relative => identifier.config_path(),
        }
    }
}

/// A config that was fetched and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Identifier whose resource supplied the config.
    pub identifier: ClientIdentifier,
    /// The parsed config.
    pub config: ClientConfig,
}

/// Result of walking a fallback policy.
#[derive(Debug, Clone, Default)]
pub struct ConfigOutcome {
    /// The first config that loaded, if any.
    pub resolved: Option<ResolvedConfig>,
    /// Failures in attempt order.
    pub failures: Vec<BrandingError>,
}

/// Config fetch client.
///
/// Maps non-success statuses to `ConfigNotFound`, unparsable bodies to
/// `ConfigMalformed` and fetch errors to `Transport`.
pub struct ConfigClient<F> {
    fetcher: F,
    style: PathStyle,
    policy: FallbackPolicy,
}

impl<F: AssetFetcher> ConfigClient<F> {
    /// Edge client: absolute paths, single attempt.
    pub fn edge(fetcher: F) -> Self {
        Self {
            fetcher,
            style: PathStyle::Absolute,
            policy: FallbackPolicy::none(),
        }
    }

    /// Page client: relative paths, one retry against the default config.
    pub fn page(fetcher: F) -> Self {
        Self {
            fetcher,
            style: PathStyle::Relative,
            policy: FallbackPolicy::default_client(),
        }
    }

    /// Fetch and parse the config for one identifier.
    pub async fn fetch_config(
        &self,
        identifier: &ClientIdentifier,
    ) -> Result<ClientConfig, BrandingError> {
        let path = self.style.path_for(identifier);

        let resp = self
            .fetcher
            .fetch(&path)
            .await
            .map_err(|e| BrandingError::Transport(e.to_string()))?;

        if !resp.is_success() {
            return Err(BrandingError::ConfigNotFound {
                identifier: identifier.to_string(),
                status: resp.status,
            });
        }

        ClientConfig::from_slice(resp.bytes()).map_err(|e| BrandingError::ConfigMalformed {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        })
    }

    /// Try each identifier the policy allows until one loads.
    pub async fn fetch_with_fallback(&self, primary: &ClientIdentifier) -> ConfigOutcome {
        let mut outcome = ConfigOutcome::default();

        for identifier in self.policy.attempts(primary) {
            match self.fetch_config(&identifier).await {
                Ok(config) => {
                    outcome.resolved = Some(ResolvedConfig { identifier, config });
                    break;
                }
                Err(e) => outcome.failures.push(e),
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetResponse, FetchError, MemoryAssets};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn id(s: &str) -> ClientIdentifier {
        ClientIdentifier::parse(s).unwrap()
    }

    /// Records requested paths and fails every fetch.
    #[derive(Default)]
    struct Unreachable {
        requested: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl AssetFetcher for Unreachable {
        async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError> {
            self.requested.borrow_mut().push(path.to_string());
            Err(FetchError::Request("connection refused".to_string()))
        }
    }

    // === Single Fetch Tests ===

    #[test]
    fn test_fetch_config_success() {
        let assets =
            MemoryAssets::new().with_asset("configs/acme.json", r#"{"name": "Acme Roofing"}"#);
        let client = ConfigClient::edge(&assets);

        let config = block_on(client.fetch_config(&id("acme"))).unwrap();
        assert_eq!(config.company_name(), "Acme Roofing");
    }

    #[test]
    fn test_fetch_config_not_found() {
        let assets = MemoryAssets::new();
        let client = ConfigClient::edge(&assets);

        let err = block_on(client.fetch_config(&id("acme"))).unwrap_err();
        assert_eq!(
            err,
            BrandingError::ConfigNotFound {
                identifier: "acme".to_string(),
                status: 404
            }
        );
    }

    #[test]
    fn test_fetch_config_malformed() {
        let assets = MemoryAssets::new().with_asset("configs/acme.json", "{ nope");
        let client = ConfigClient::edge(&assets);

        let err = block_on(client.fetch_config(&id("acme"))).unwrap_err();
        assert_eq!(err.kind(), "config_malformed");
    }

    #[test]
    fn test_fetch_config_transport_error() {
        let fetcher = Unreachable::default();
        let client = ConfigClient::edge(&fetcher);

        let err = block_on(client.fetch_config(&id("acme"))).unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert_eq!(*fetcher.requested.borrow(), vec!["/configs/acme.json".to_string()]);
    }

    // === Fallback Tests ===

    #[test]
    fn test_page_client_uses_relative_paths_and_retries_default() {
        let fetcher = Unreachable::default();
        let client = ConfigClient::page(&fetcher);

        let outcome = block_on(client.fetch_with_fallback(&id("acme")));

        assert!(outcome.resolved.is_none());
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(
            *fetcher.requested.borrow(),
            vec![
                "configs/acme.json".to_string(),
                "configs/roofer_config.json".to_string()
            ]
        );
    }

    #[test]
    fn test_fallback_resolves_default_config() {
        let assets = MemoryAssets::new()
            .with_asset("configs/roofer_config.json", r#"{"companyName": "Default Roofing"}"#);
        let client = ConfigClient::page(&assets);

        let outcome = block_on(client.fetch_with_fallback(&id("acme")));
        let resolved = outcome.resolved.unwrap();

        assert!(resolved.identifier.is_default());
        assert_eq!(resolved.config.company_name(), "Default Roofing");
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn test_edge_client_never_retries() {
        let fetcher = Unreachable::default();
        let client = ConfigClient::edge(&fetcher);

        let outcome = block_on(client.fetch_with_fallback(&id("acme")));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(fetcher.requested.borrow().len(), 1);
    }
}

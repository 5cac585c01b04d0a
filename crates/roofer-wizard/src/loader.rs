//! Page-side config loading.

use roofer_core::{ClientConfig, ClientIdentifier};
use roofer_data::{AssetFetcher, ConfigClient};
use roofer_observability::StructuredLogger;

/// Where the config in effect came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The requested client's own config.
    Client(ClientIdentifier),
    /// The shared default config, after the client's failed.
    Default,
    /// Built-in values, after both fetches failed.
    BuiltIn,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Client(_) => "client",
            ConfigSource::Default => "default",
            ConfigSource::BuiltIn => "built_in",
        }
    }
}

/// A config ready to apply to a `WizardContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub source: ConfigSource,
}

/// Loads `configs/<id>.json`, retrying once with the default config.
///
/// Never fails: when both fetches fail the built-in config is returned.
pub struct ConfigLoader<F> {
    client: ConfigClient<F>,
    logger: StructuredLogger,
}

impl<F: AssetFetcher> ConfigLoader<F> {
    /// Create a loader over a page-relative fetcher.
    pub fn new(fetcher: F, logger: StructuredLogger) -> Self {
        Self {
            client: ConfigClient::page(fetcher),
            logger,
        }
    }

    /// Load the config for `identifier`.
    pub async fn load(&self, identifier: &ClientIdentifier) -> LoadedConfig {
        let outcome = self.client.fetch_with_fallback(identifier).await;

        for failure in &outcome.failures {
            self.logger
                .warn_builder("Config load failed")
                .field("identifier", identifier.as_str())
                .branding_error(failure)
                .emit();
        }

        match outcome.resolved {
            Some(resolved) => {
                let source = if &resolved.identifier == identifier {
                    ConfigSource::Client(resolved.identifier)
                } else {
                    ConfigSource::Default
                };
                self.logger
                    .info_builder("Config loaded")
                    .field("identifier", identifier.as_str())
                    .field("source", source.as_str())
                    .field_bool("fallback", source == ConfigSource::Default)
                    .emit();
                LoadedConfig {
                    config: resolved.config,
                    source,
                }
            }
            None => {
                self.logger
                    .warn_builder("Using built-in config")
                    .field("identifier", identifier.as_str())
                    .emit();
                LoadedConfig {
                    config: ClientConfig::built_in(),
                    source: ConfigSource::BuiltIn,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use roofer_core::RequestId;
    use roofer_data::MemoryAssets;

    fn loader(assets: MemoryAssets) -> ConfigLoader<MemoryAssets> {
        let logger = StructuredLogger::new(RequestId::from_string("session")).with_component("wizard");
        ConfigLoader::new(assets, logger)
    }

    fn id(s: &str) -> ClientIdentifier {
        ClientIdentifier::parse(s).unwrap()
    }

    #[test]
    fn test_loads_client_config() {
        let assets = MemoryAssets::new().with_asset("configs/acme.json", r#"{"name": "Acme"}"#);
        let loaded = block_on(loader(assets).load(&id("acme")));

        assert_eq!(loaded.source, ConfigSource::Client(id("acme")));
        assert_eq!(loaded.config.company_name(), "Acme");
    }

    #[test]
    fn test_falls_back_to_default_config() {
        let assets = MemoryAssets::new()
            .with_asset("configs/acme.json", "not json")
            .with_asset("configs/roofer_config.json", r#"{"phoneNumber": 5551234}"#);
        let loaded = block_on(loader(assets).load(&id("acme")));

        assert_eq!(loaded.source, ConfigSource::Default);
        assert_eq!(loaded.config.phone_number.as_deref(), Some("5551234"));
    }

    #[test]
    fn test_falls_back_to_built_in() {
        let loaded = block_on(loader(MemoryAssets::new()).load(&id("acme")));
        assert_eq!(loaded.source, ConfigSource::BuiltIn);
        assert_eq!(loaded.config, ClientConfig::built_in());
    }

    #[test]
    fn test_default_identifier_is_fetched_once() {
        let assets = MemoryAssets::new()
            .with_asset("configs/roofer_config.json", r#"{"companyName": "Default Co"}"#);
        let loaded = block_on(loader(assets).load(&ClientIdentifier::default_client()));

        assert_eq!(
            loaded.source,
            ConfigSource::Client(ClientIdentifier::default_client())
        );
    }
}

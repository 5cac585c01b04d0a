//! Component settings from Spin application variables.

use anyhow::{anyhow, Context, Result};
use roofer_sdk::roofer_observability::LogFormat;
use url::Url;

/// Base URL of the static site the middleware fronts.
pub const ORIGIN_URL: &str = "origin_url";
/// Base URL for `/configs/*.json`; defaults to the origin.
pub const ASSETS_URL: &str = "assets_url";
/// `json` or `human`.
pub const LOG_FORMAT: &str = "log_format";

/// Resolved component settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub origin: Url,
    pub assets: Url,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the Spin variable store.
    pub fn load() -> Result<Self> {
        let origin = spin_sdk::variables::get(ORIGIN_URL)
            .map_err(|e| anyhow!("{:?}", e))
            .with_context(|| format!("variable {} is required", ORIGIN_URL))?;
        let assets = optional(ASSETS_URL);
        let log_format = optional(LOG_FORMAT);

        Self::from_values(&origin, assets.as_deref(), log_format.as_deref())
    }

    /// Build settings from raw variable values.
    pub fn from_values(origin: &str, assets: Option<&str>, log_format: Option<&str>) -> Result<Self> {
        let origin = parse_base(origin).with_context(|| format!("invalid {}", ORIGIN_URL))?;
        let assets = match assets {
            Some(raw) => parse_base(raw).with_context(|| format!("invalid {}", ASSETS_URL))?,
            None => origin.clone(),
        };

        Ok(Self {
            origin,
            assets,
            log_format: log_format.map(LogFormat::parse).unwrap_or_default(),
        })
    }

    /// Origin URL for an incoming path and query.
    pub fn origin_url(&self, path_with_query: &str) -> Result<Url> {
        self.origin
            .join(path_with_query)
            .with_context(|| format!("cannot map {} onto origin", path_with_query))
    }
}

fn optional(name: &str) -> Option<String> {
    spin_sdk::variables::get(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("{} cannot be a base URL", raw));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_default_to_origin() {
        let settings = Settings::from_values("https://site.example.com", None, None).unwrap();
        assert_eq!(settings.assets, settings.origin);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_explicit_values() {
        let settings = Settings::from_values(
            "https://site.example.com",
            Some("https://assets.example.com"),
            Some("human"),
        )
        .unwrap();
        assert_eq!(settings.assets.as_str(), "https://assets.example.com/");
        assert_eq!(settings.log_format, LogFormat::Human);
    }

    #[test]
    fn test_origin_url_mapping() {
        let settings = Settings::from_values("https://site.example.com/", None, None).unwrap();
        assert_eq!(
            settings.origin_url("/index.html?config=acme").unwrap().as_str(),
            "https://site.example.com/index.html?config=acme"
        );
    }

    #[test]
    fn test_invalid_origin_rejected() {
        assert!(Settings::from_values("not a url", None, None).is_err());
        assert!(Settings::from_values("mailto:x@example.com", None, None).is_err());
    }
}

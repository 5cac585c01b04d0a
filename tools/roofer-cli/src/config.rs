//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// CLI configuration file (`roofer.toml` or `roofer.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Local site layout.
    #[serde(default)]
    pub site: SiteConfig,

    /// Defaults for `roofer preview` and `roofer wizard`.
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config content; the format follows the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content).with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Where the static site lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root, relative to the working directory.
    #[serde(default = "default_root")]
    pub root: String,

    /// Config directory, relative to the site root.
    #[serde(default = "default_configs_dir")]
    pub configs_dir: String,

    /// Page served for `/`, relative to the site root.
    #[serde(default = "default_index")]
    pub index: String,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_configs_dir() -> String {
    "configs".to_string()
}

fn default_index() -> String {
    "index.html".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            configs_dir: default_configs_dir(),
            index: default_index(),
        }
    }
}

/// Request defaults for previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Host to impersonate when `--host` is not given.
    #[serde(default)]
    pub host: Option<String>,

    /// Scheme of the impersonated request.
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_scheme() -> String {
    "https".to_string()
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: None,
            scheme: default_scheme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CliConfig::parse("roofer.toml", "").unwrap();
        assert_eq!(config.site.root, ".");
        assert_eq!(config.site.configs_dir, "configs");
        assert_eq!(config.site.index, "index.html");
        assert_eq!(config.preview.host, None);
        assert_eq!(config.preview.scheme, "https");
    }

    #[test]
    fn test_toml_sections() {
        let config = CliConfig::parse(
            "roofer.toml",
            r#"
[site]
root = "public"

[preview]
host = "acme.pages.dev"
"#,
        )
        .unwrap();
        assert_eq!(config.site.root, "public");
        assert_eq!(config.site.configs_dir, "configs");
        assert_eq!(config.preview.host.as_deref(), Some("acme.pages.dev"));
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse(
            "roofer.json",
            r#"{"preview": {"scheme": "http"}}"#,
        )
        .unwrap();
        assert_eq!(config.preview.scheme, "http");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(CliConfig::parse("roofer.toml", "[site\nroot = 1").is_err());
    }
}

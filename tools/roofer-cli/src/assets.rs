//! Site assets read from the local filesystem.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use roofer_data::{AssetFetcher, AssetResponse, FetchError};

/// URL prefix under which client configs are requested.
const CONFIGS_PREFIX: &str = "configs";

/// Serves asset paths from a site root directory.
///
/// Absolute and relative paths both resolve against the root; a missing
/// file is a 404 response. Paths under `configs/` resolve against the
/// configs directory, which defaults to `<root>/configs`.
pub struct FsAssetFetcher {
    root: PathBuf,
    configs_dir: PathBuf,
}

impl FsAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let configs_dir = root.join(CONFIGS_PREFIX);
        Self { root, configs_dir }
    }

    /// Serve `configs/*` from `dir` instead of `<root>/configs`.
    pub fn with_configs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.configs_dir = dir.into();
        self
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FetchError::InvalidUrl(path.to_string()));
        }
        match relative.strip_prefix(CONFIGS_PREFIX) {
            Ok(rest) => Ok(self.configs_dir.join(rest)),
            Err(_) => Ok(self.root.join(relative)),
        }
    }
}

#[async_trait(?Send)]
impl AssetFetcher for FsAssetFetcher {
    async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(body) => Ok(AssetResponse::ok(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AssetResponse::not_found()),
            Err(e) => Err(FetchError::Request(format!("{}: {}", file.display(), e))),
        }
    }
}

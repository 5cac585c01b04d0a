//! Host capability for fetching same-origin assets.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::response::AssetResponse;

/// Error type for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Fetches assets served alongside the site, by path.
///
/// The edge passes absolute paths (`/configs/acme.json`), the page passes
/// relative ones (`configs/acme.json`); implementations resolve either
/// against their own base. A missing asset is a non-success
/// `AssetResponse`, not an error.
#[async_trait(?Send)]
pub trait AssetFetcher {
    /// Fetch the asset at `path`.
    async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError>;
}

#[async_trait(?Send)]
impl<T: AssetFetcher + ?Sized> AssetFetcher for &T {
    async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError> {
        (**self).fetch(path).await
    }
}

/// In-memory asset table, keyed by path without a leading slash.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset.
    pub fn with_asset(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.assets
            .insert(path.trim_start_matches('/').to_string(), body.into());
        self
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[async_trait(?Send)]
impl AssetFetcher for MemoryAssets {
    async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError> {
        Ok(self
            .assets
            .get(path.trim_start_matches('/'))
            .map(|body| AssetResponse::ok(body.clone()))
            .unwrap_or_else(AssetResponse::not_found))
    }
}

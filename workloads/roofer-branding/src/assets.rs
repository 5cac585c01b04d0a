//! Same-origin asset fetches through Spin outbound HTTP.

use async_trait::async_trait;
use roofer_sdk::roofer_data::{AssetFetcher, AssetResponse, FetchError};
use spin_sdk::http::{Request, Response};
use url::Url;

/// Fetches config assets from the static site.
pub struct SpinAssetFetcher {
    base: Url,
}

impl SpinAssetFetcher {
    /// Create a fetcher resolving paths against `base`.
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

#[async_trait(?Send)]
impl AssetFetcher for SpinAssetFetcher {
    async fn fetch(&self, path: &str) -> Result<AssetResponse, FetchError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))?;

        let req = Request::get(url.as_str()).build();
        let resp: Response = spin_sdk::http::send(req)
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(AssetResponse::new(*resp.status(), resp.body().to_vec()))
    }
}

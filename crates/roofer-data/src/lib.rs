//! Config resource access.
//!
//! This crate provides:
//! - `AssetFetcher` - Host capability for fetching same-origin assets
//! - `AssetResponse` - Status and body of a fetched asset
//! - `ConfigClient` - Typed config fetch with the error taxonomy applied
//! - `FallbackPolicy` - Which identifiers to try, in order

mod client;
mod fetcher;
mod response;
mod retry;

pub use client::*;
pub use fetcher::*;
pub use response::*;
pub use retry::*;

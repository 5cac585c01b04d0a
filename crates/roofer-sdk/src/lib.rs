//! Public SDK for the white-label roofing estimate platform.
//!
//! This crate re-exports all platform functionality:
//!
//! ```ignore
//! use roofer_sdk::prelude::*;
//!
//! async fn brand(ctx: RequestContext, origin: OriginResponse, assets: impl AssetFetcher) -> OriginResponse {
//!     let logger = StructuredLogger::new(ctx.request_id.clone()).with_component("branding");
//!     BrandingPipeline::new(assets, logger)
//!         .handle_buffered(&ctx, origin)
//!         .await
//! }
//! ```

pub use roofer_cache;
pub use roofer_core;
pub use roofer_data;
pub use roofer_executor;
pub use roofer_observability;
pub use roofer_streaming;
pub use roofer_wizard;

/// Prelude for convenient imports.
pub mod prelude {
    pub use roofer_cache::*;
    pub use roofer_core::*;
    pub use roofer_data::*;
    pub use roofer_executor::*;
    pub use roofer_observability::*;
    pub use roofer_streaming::*;
    pub use roofer_wizard::*;
}

//! Edge branding pipeline.
//!
//! This crate ties the edge rewrite together:
//! - `is_rewritable_path` - Which paths are eligible
//! - `BrandingPipeline` - Identify, fetch config, plan and rewrite
//! - `PassReason` - Why a response went through untouched

mod fallback;
mod gate;
mod pipeline;

pub use fallback::*;
pub use gate::*;
pub use pipeline::*;

//! Streaming branding rewrite.
//!
//! This crate applies client branding to HTML chunk by chunk:
//! - `RewriteTargets` - Declarative table of selectors and replacements
//! - `StreamRewriter` - Incremental rewrite engine
//! - `RewritingSink` - Feeds origin chunks through the engine into a sink
//! - `markup` - Injected hero and style markup

mod engine;
pub mod markup;
mod rules;
mod sink;

pub use engine::*;
pub use rules::*;
pub use sink::*;

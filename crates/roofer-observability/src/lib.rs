//! Observability for the roofing estimate platform.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with request context
//! - `LogBuilder` - Fluent typed log fields

mod logging;

pub use logging::*;

// Re-export RequestId from roofer-core for convenience
pub use roofer_core::RequestId;

//! Core abstractions for the white-label roofing estimate platform.
//!
//! This crate provides the fundamental types shared by the edge rewriter
//! and the estimate wizard:
//! - `ClientIdentifier` - Per-client lookup key derived from a host name
//! - `ClientConfig` - Per-client branding and contact record
//! - `Branding` - Request-scoped branding values derived from a config
//! - `RequestContext` - Typed request parameters
//! - `BrandingError` - Error taxonomy for the fail-open paths

mod branding;
mod config;
mod context;
mod error;
mod identifier;

pub use branding::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use identifier::*;

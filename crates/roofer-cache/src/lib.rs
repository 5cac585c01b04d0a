//! Response header handling for branded pages.
//!
//! This crate provides:
//! - `apply_no_store` - Disable caching on rewritten responses
//! - `strip_length` - Drop headers invalidated by a body rewrite
//! - `is_rewritable_body` - Decide from headers whether a body can be rewritten
//! - `from_pairs` / `to_pairs` - Conversion to and from host header lists

mod headers;

pub use headers::*;

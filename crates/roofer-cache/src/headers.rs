//! Header policy for rewritten responses.

use http::header::{
    HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE,
    EXPIRES, PRAGMA,
};
use http::HeaderMap;

/// Header list in the shape host APIs use.
pub type HeaderPairs = Vec<(String, Vec<u8>)>;

/// Connection-scoped headers that never cross a proxy hop.
pub const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// `Cache-Control` value set on rewritten responses.
pub const NO_STORE_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

/// Errors converting host header lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("Invalid header name: {0}")]
    InvalidName(String),

    #[error("Invalid value for header {0}")]
    InvalidValue(String),
}

/// Mark a response as uncacheable.
///
/// Rewritten pages are per-host, so no shared cache may keep them.
pub fn apply_no_store(headers: &mut HeaderMap) {
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static(NO_STORE_CACHE_CONTROL),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
}

/// Drop headers that describe the origin body length.
pub fn strip_length(headers: &mut HeaderMap) {
    headers.remove(CONTENT_LENGTH);
}

/// Check if a body with these headers can go through the HTML rewriter.
///
/// Encoded bodies and non-HTML content types are left alone. A missing
/// `Content-Type` is treated as HTML.
pub fn is_rewritable_body(headers: &HeaderMap) -> bool {
    let identity = headers.get_all(CONTENT_ENCODING).iter().all(|v| {
        v.to_str()
            .map(|s| s.split(',').all(|c| c.trim().eq_ignore_ascii_case("identity")))
            .unwrap_or(false)
    });

    let html = match headers.get(CONTENT_TYPE) {
        None => true,
        Some(v) => v
            .to_str()
            .map(|s| s.trim().to_ascii_lowercase().starts_with("text/html"))
            .unwrap_or(false),
    };

    identity && html
}

/// Drop hop-by-hop headers from an origin header list.
///
/// Removes the fixed [`HOP_BY_HOP`] set plus every header named in a
/// `Connection` value. Name matching is case-insensitive.
pub fn sanitize_pairs(pairs: HeaderPairs) -> HeaderPairs {
    let mut listed: Vec<String> = Vec::new();
    for (_, value) in pairs
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("connection"))
    {
        listed.extend(
            String::from_utf8_lossy(value)
                .split(',')
                .map(|token| token.trim().to_ascii_lowercase())
                .filter(|token| !token.is_empty()),
        );
    }

    pairs
        .into_iter()
        .filter(|(name, _)| {
            let name = name.to_ascii_lowercase();
            !HOP_BY_HOP.contains(&name.as_str()) && !listed.contains(&name)
        })
        .collect()
}

/// Build a `HeaderMap` from a host header list.
pub fn from_pairs<I, N, V>(pairs: I) -> Result<HeaderMap, HeaderError>
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = name.as_ref();
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HeaderError::InvalidName(name.to_string()))?;
        let value = HeaderValue::from_bytes(value.as_ref())
            .map_err(|_| HeaderError::InvalidValue(name.to_string()))?;
        headers.append(header, value);
    }
    Ok(headers)
}

/// Flatten a `HeaderMap` into a host header list, keeping repeated headers.
pub fn to_pairs(headers: &HeaderMap) -> HeaderPairs {
    headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
        .collect()
}

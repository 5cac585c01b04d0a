//! Client identifier resolution from host names.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use crate::error::BrandingError;

/// Identifier used when nothing better can be derived.
pub const DEFAULT_IDENTIFIER: &str = "roofer_config";

/// Label that is never a client identifier.
pub const RESERVED_IDENTIFIER: &str = "www";

/// Platform preview deployments: `<token>.pages.dev`.
const PREVIEW_DOMAIN: &str = ".pages.dev";

/// Per-client lookup key.
///
/// Always non-empty, never `www`, and restricted to ASCII alphanumerics,
/// `-` and `_` so it can be interpolated into a resource path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientIdentifier(String);

/// How the edge classifies a request host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// `<token>.pages.dev` preview deployment.
    PreviewDeployment,
    /// Any other multi-label, non-local host. Best-effort first-label mapping.
    CustomDomain,
    /// `localhost`, IP literals and single-label hosts.
    Local,
}

impl HostKind {
    /// Classify a host name the way the edge rewriter does.
    pub fn classify(host: &str) -> Self {
        if is_ip_literal(host) {
            Self::Local
        } else if host.contains(PREVIEW_DOMAIN) {
            Self::PreviewDeployment
        } else if !host.contains("localhost") && host.contains('.') {
            Self::CustomDomain
        } else {
            Self::Local
        }
    }

    /// Name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PreviewDeployment => "preview",
            Self::CustomDomain => "custom",
            Self::Local => "local",
        }
    }
}

impl ClientIdentifier {
    /// Validate a raw token. Returns `None` for empty, reserved or
    /// path-unsafe tokens.
    pub fn parse(token: &str) -> Option<Self> {
        let valid = !token.is_empty()
            && token != RESERVED_IDENTIFIER
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(token.to_string()))
    }

    /// The sentinel default identifier.
    pub fn default_client() -> Self {
        Self(DEFAULT_IDENTIFIER.to_string())
    }

    /// Resolve the identifier for an edge request host.
    ///
    /// Preview deployments and custom domains both map to their first
    /// label. Local hosts, `www` and unusable labels are unresolved, in
    /// which case the edge must not personalize the response.
    pub fn from_edge_host(host: &str) -> Result<Self, BrandingError> {
        let unresolved = || BrandingError::IdentifierUnresolved(host.to_string());
        match HostKind::classify(host) {
            HostKind::Local => Err(unresolved()),
            HostKind::PreviewDeployment | HostKind::CustomDomain => {
                first_label(host).and_then(Self::parse).ok_or_else(unresolved)
            }
        }
    }

    /// Resolve the identifier for a page, client side.
    ///
    /// A usable override wins. Otherwise a true subdomain (more than two
    /// labels) yields its first label, and everything else, including
    /// `localhost`, `127.*` and IP literals, yields the default.
    pub fn for_page(host: &str, override_param: Option<&str>) -> Self {
        if let Some(id) = override_param.and_then(Self::parse) {
            return id;
        }

        if host == "localhost" || host.starts_with("127") || is_ip_literal(host) {
            return Self::default_client();
        }

        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() > 2 {
            Self::parse(labels[0]).unwrap_or_default()
        } else {
            Self::default_client()
        }
    }

    /// Check if this is the sentinel default identifier.
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_IDENTIFIER
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative config resource path, `configs/<id>.json`.
    pub fn config_path(&self) -> String {
        format!("configs/{}.json", self.0)
    }

    /// Same-origin absolute config path, `/configs/<id>.json`.
    pub fn asset_path(&self) -> String {
        format!("/{}", self.config_path())
    }
}

impl Default for ClientIdentifier {
    fn default() -> Self {
        Self::default_client()
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientIdentifier {
    type Error = BrandingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(BrandingError::IdentifierUnresolved(value))
    }
}

impl From<ClientIdentifier> for String {
    fn from(id: ClientIdentifier) -> Self {
        id.0
    }
}

fn first_label(host: &str) -> Option<&str> {
    host.split('.').next()
}

fn is_ip_literal(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>().is_ok()
}

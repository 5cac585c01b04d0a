//! Pass-through reasons.

use roofer_core::BrandingError;

/// Why a response is returned unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassReason {
    /// Path is not a page entry point.
    IneligiblePath,
    /// Body is encoded or not HTML.
    UnsupportedBody,
    /// No client identifier in the host.
    Unresolved(BrandingError),
    /// Config could not be fetched or parsed.
    ConfigUnavailable(BrandingError),
    /// The rewrite itself failed.
    RewriteFailed(BrandingError),
}

impl PassReason {
    /// Short machine-readable name used as a log field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IneligiblePath => "ineligible_path",
            Self::UnsupportedBody => "unsupported_body",
            Self::Unresolved(_) => "identifier_unresolved",
            Self::ConfigUnavailable(_) => "config_unavailable",
            Self::RewriteFailed(_) => "rewrite_failed",
        }
    }

    /// The underlying error, when there is one.
    pub fn error(&self) -> Option<&BrandingError> {
        match self {
            Self::Unresolved(e) | Self::ConfigUnavailable(e) | Self::RewriteFailed(e) => Some(e),
            Self::IneligiblePath | Self::UnsupportedBody => None,
        }
    }

    /// Check if this reason is an operational failure worth a warning.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ConfigUnavailable(_) | Self::RewriteFailed(_))
    }
}

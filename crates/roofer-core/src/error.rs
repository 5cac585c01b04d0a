//! Error taxonomy for branding resolution.
//!
//! Every variant is recoverable. Callers log the error and fall back to the
//! unmodified response or the default configuration.

/// Errors raised while resolving, fetching or applying client branding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrandingError {
    #[error("Config not found for {identifier}: HTTP {status}")]
    ConfigNotFound { identifier: String, status: u16 },

    #[error("Config for {identifier} is malformed: {reason}")]
    ConfigMalformed { identifier: String, reason: String },

    #[error("No client identifier in host {0:?}")]
    IdentifierUnresolved(String),

    #[error("Rewrite failed: {0}")]
    RewriteFailure(String),

    #[error("Asset fetch failed: {0}")]
    Transport(String),
}

impl BrandingError {
    /// Short machine-readable name used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "config_not_found",
            Self::ConfigMalformed { .. } => "config_malformed",
            Self::IdentifierUnresolved(_) => "identifier_unresolved",
            Self::RewriteFailure(_) => "rewrite_failure",
            Self::Transport(_) => "transport",
        }
    }
}

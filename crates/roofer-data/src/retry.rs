//! Fallback policies for config fetches.

use roofer_core::ClientIdentifier;

/// Which identifiers a config fetch tries, in order.
///
/// The edge makes a single attempt. The page retries once against the
/// default identifier before giving up to built-in values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    fallback: Option<ClientIdentifier>,
}

impl FallbackPolicy {
    /// Single attempt, no fallback.
    pub fn none() -> Self {
        Self { fallback: None }
    }

    /// One retry against the default identifier.
    pub fn default_client() -> Self {
        Self::with_fallback(ClientIdentifier::default_client())
    }

    /// One retry against a specific identifier.
    pub fn with_fallback(fallback: ClientIdentifier) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    /// Identifiers to try for `primary`. A fallback equal to the primary
    /// is not tried twice.
    pub fn attempts(&self, primary: &ClientIdentifier) -> Vec<ClientIdentifier> {
        let mut attempts = vec![primary.clone()];
        if let Some(fallback) = &self.fallback {
            if fallback != primary {
                attempts.push(fallback.clone());
            }
        }
        attempts
    }

    /// Maximum number of fetches.
    pub fn max_attempts(&self) -> u32 {
        1 + u32::from(self.fallback.is_some())
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ClientIdentifier {
        ClientIdentifier::parse(s).unwrap()
    }

    #[test]
    fn test_none_is_single_attempt() {
        let policy = FallbackPolicy::none();
        assert_eq!(policy.attempts(&id("acme")), vec![id("acme")]);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_default_client_retries_once() {
        let policy = FallbackPolicy::default_client();
        assert_eq!(
            policy.attempts(&id("acme")),
            vec![id("acme"), ClientIdentifier::default_client()]
        );
        assert_eq!(policy.max_attempts(), 2);
    }

    #[test]
    fn test_fallback_not_repeated() {
        let policy = FallbackPolicy::default_client();
        let default = ClientIdentifier::default_client();
        assert_eq!(policy.attempts(&default), vec![default.clone()]);
    }
}

//! Fetched asset responses.

/// Status and body of a fetched asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    /// An empty 404 response.
    pub fn not_found() -> Self {
        Self::new(404, Vec::new())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Status Check Tests ===

    #[test]
    fn test_response_is_success() {
        assert!(AssetResponse::new(200, "").is_success());
        assert!(AssetResponse::new(204, "").is_success());
        assert!(!AssetResponse::new(199, "").is_success());
        assert!(!AssetResponse::new(304, "").is_success());
        assert!(!AssetResponse::not_found().is_success());
        assert!(!AssetResponse::new(500, "").is_success());
    }

    // === Body Tests ===

    #[test]
    fn test_not_found_is_empty() {
        let resp = AssetResponse::not_found();
        assert_eq!(resp.status, 404);
        assert!(resp.bytes().is_empty());
    }

    #[test]
    fn test_bytes_are_the_body() {
        let resp = AssetResponse::ok(vec![0xff, 0xfe]);
        assert_eq!(resp.bytes(), &[0xff, 0xfe]);
    }
}

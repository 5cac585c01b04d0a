//! Request-scoped branding values.

use url::Url;

use crate::config::ClientConfig;

/// Screenshot service used for social preview images.
pub const PREVIEW_IMAGE_SERVICE: &str = "https://image.thum.io/get/width/1200/crop/630/noanim";

/// Branding values injected into a page for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    /// Display name of the contractor.
    pub company_name: String,
    /// Document and social title.
    pub page_title: String,
    /// Meta and social description.
    pub description: String,
    /// Social preview image URL.
    pub preview_image_url: String,
    /// Request origin, e.g. `https://acme.pages.dev`.
    pub origin: String,
}

impl Branding {
    /// Derive branding from a config and the request URL.
    ///
    /// The preview image renders the original host, so it stays stable
    /// (and cacheable) across requests.
    pub fn derive(config: &ClientConfig, request_url: &Url) -> Self {
        let company_name = config.company_name().to_string();
        let host = request_url.host_str().unwrap_or_default();

        Self {
            page_title: format!("{} - Roofing Cost Estimate", company_name),
            description: format!(
                "Get an accurate roofing estimate from {} in minutes. Interactive and easy to use.",
                company_name
            ),
            preview_image_url: format!("{}/https://{}", PREVIEW_IMAGE_SERVICE, host),
            origin: request_url.origin().ascii_serialization(),
            company_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_branding() {
        let config = ClientConfig {
            name: Some("Acme Roofing".to_string()),
            ..ClientConfig::default()
        };
        let url = Url::parse("https://acme.pages.dev/index.html?utm=x").unwrap();

        let branding = Branding::derive(&config, &url);

        assert_eq!(branding.company_name, "Acme Roofing");
        assert_eq!(branding.page_title, "Acme Roofing - Roofing Cost Estimate");
        assert_eq!(
            branding.description,
            "Get an accurate roofing estimate from Acme Roofing in minutes. Interactive and easy to use."
        );
        assert_eq!(
            branding.preview_image_url,
            "https://image.thum.io/get/width/1200/crop/630/noanim/https://acme.pages.dev"
        );
        assert_eq!(branding.origin, "https://acme.pages.dev");
    }

    #[test]
    fn test_derive_branding_default_name_and_port() {
        let url = Url::parse("http://acme.example.com:8787/").unwrap();
        let branding = Branding::derive(&ClientConfig::default(), &url);

        assert_eq!(branding.page_title, "Roofer - Roofing Cost Estimate");
        assert_eq!(branding.origin, "http://acme.example.com:8787");
        assert!(branding.preview_image_url.ends_with("/https://acme.example.com"));
    }
}

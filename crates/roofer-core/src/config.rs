//! Per-client branding and contact configuration.

use serde::{Deserialize, Deserializer, Serialize};

/// Company name used when a config names none.
pub const FALLBACK_COMPANY_NAME: &str = "Roofer";

/// Contact number baked into the wizard when no config can be loaded.
pub const BUILT_IN_PHONE_NUMBER: &str = "9987412299";

/// Outbound contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// WhatsApp-style messaging deep link.
    Messaging,
    /// SMS URI.
    Sms,
    /// Mailto URI.
    Email,
}

impl Channel {
    /// All channels in display order.
    pub const ALL: [Channel; 3] = [Channel::Messaging, Channel::Sms, Channel::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Messaging => "messaging",
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }
}

/// Client configuration as served from `configs/<identifier>.json`.
///
/// Every field is optional. Unknown fields are ignored and contact values
/// given as JSON numbers are read as their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Preferred display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Legacy display name, used when `companyName` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number for the SMS channel.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number: Option<String>,
    /// Number for the messaging channel.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub whatsapp_number: Option<String>,
    /// Address for the email channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ClientConfig {
    /// Parse a config resource body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Defaults the wizard runs with until (or unless) a config loads.
    pub fn built_in() -> Self {
        Self {
            phone_number: Some(BUILT_IN_PHONE_NUMBER.to_string()),
            whatsapp_number: Some(BUILT_IN_PHONE_NUMBER.to_string()),
            ..Self::default()
        }
    }

    /// Display name: `companyName`, else `name`, else "Roofer".
    ///
    /// Empty strings count as absent.
    pub fn company_name(&self) -> &str {
        non_empty(&self.company_name)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(FALLBACK_COMPANY_NAME)
    }

    /// Configured value for a contact channel, if present and non-empty.
    pub fn contact(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Messaging => non_empty(&self.whatsapp_number),
            Channel::Sms => non_empty(&self.phone_number),
            Channel::Email => non_empty(&self.email),
        }
    }

    /// Channels this config enables, in display order.
    pub fn enabled_channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| self.contact(*c).is_some())
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ClientConfig::from_slice(
            br#"{
                "companyName": "Acme Roofing",
                "phoneNumber": "555-0100",
                "whatsappNumber": "+1 555 0100",
                "email": "hello@acme.test",
                "theme": "dark"
            }"#,
        )
        .unwrap();

        assert_eq!(config.company_name(), "Acme Roofing");
        assert_eq!(config.contact(Channel::Sms), Some("555-0100"));
        assert_eq!(config.contact(Channel::Messaging), Some("+1 555 0100"));
        assert_eq!(config.contact(Channel::Email), Some("hello@acme.test"));
    }

    #[test]
    fn test_company_name_fallbacks() {
        let config = ClientConfig::from_slice(br#"{"name": "Acme Roofing"}"#).unwrap();
        assert_eq!(config.company_name(), "Acme Roofing");

        let config =
            ClientConfig::from_slice(br#"{"companyName": "", "name": "Bravo"}"#).unwrap();
        assert_eq!(config.company_name(), "Bravo");

        let config = ClientConfig::from_slice(b"{}").unwrap();
        assert_eq!(config.company_name(), "Roofer");
    }

    #[test]
    fn test_empty_contact_is_suppressed() {
        let config = ClientConfig::from_slice(
            br#"{"phoneNumber": "555", "email": "", "whatsappNumber": "555"}"#,
        )
        .unwrap();

        assert_eq!(config.contact(Channel::Email), None);
        assert_eq!(
            config.enabled_channels(),
            vec![Channel::Messaging, Channel::Sms]
        );
    }

    #[test]
    fn test_numeric_contact_numbers() {
        let config =
            ClientConfig::from_slice(br#"{"phoneNumber": 5550100, "whatsappNumber": null}"#)
                .unwrap();
        assert_eq!(config.contact(Channel::Sms), Some("5550100"));
        assert_eq!(config.contact(Channel::Messaging), None);
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(ClientConfig::from_slice(b"not json").is_err());
        assert!(ClientConfig::from_slice(b"[1, 2]").is_err());
        assert!(ClientConfig::from_slice(br#"{"phoneNumber": true}"#).is_err());
    }

    #[test]
    fn test_built_in_defaults() {
        let config = ClientConfig::built_in();
        assert_eq!(config.company_name(), "Roofer");
        assert_eq!(config.contact(Channel::Sms), Some(BUILT_IN_PHONE_NUMBER));
        assert_eq!(config.contact(Channel::Email), None);
    }
}

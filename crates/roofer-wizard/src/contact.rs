//! Outbound contact links built on the final step.

use roofer_core::{Channel, ClientConfig};
use serde::Serialize;

use crate::state::{Field, WizardState};

/// Subject line of the email link.
pub const EMAIL_SUBJECT: &str = "Roofing Inquiry";

/// Plain-text inquiry carrying every answer.
pub fn compose_message(company_name: &str, state: &WizardState) -> String {
    let line = |label: &str, field: Field| format!("- {}: {}\n", label, state.value(field));

    let mut message = format!(
        "Hello {}, I'd like to reach out regarding my roof.\n\nProperty Details:\n",
        company_name
    );
    message.push_str(&line("Zip", Field::Zipcode));
    message.push_str(&line("Relation", Field::Relation));
    message.push_str(&line("Type", Field::Type));
    message.push_str(&line("Age", Field::Age));
    message.push_str(&line("Stories", Field::Stories));
    message.push_str(&line("Size", Field::Size));
    message.push_str(&line("Problem", Field::Situation));
    message.push_str(&line("Duration", Field::Duration));
    message.push_str("\nPlease contact me to discuss next steps.");
    message
}

/// Deep links for each channel the config enables.
///
/// The message is encoded once and shared by every link. A channel with
/// no configured contact has no link and its button stays hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    messaging: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl ContactLinks {
    /// Build links for `state` using the contacts in `config`.
    pub fn build(config: &ClientConfig, state: &WizardState) -> Self {
        let message = compose_message(config.company_name(), state);
        let encoded = urlencoding::encode(&message);

        let messaging = config
            .contact(Channel::Messaging)
            .map(|number| number.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
            .filter(|digits| !digits.is_empty())
            .map(|digits| format!("https://wa.me/{}?text={}", digits, encoded));

        let sms = config
            .contact(Channel::Sms)
            .map(|phone| format!("sms:{}?&body={}", phone, encoded));

        let email = config.contact(Channel::Email).map(|address| {
            format!(
                "mailto:{}?subject={}&body={}",
                address,
                urlencoding::encode(EMAIL_SUBJECT),
                encoded
            )
        });

        Self {
            message,
            messaging,
            sms,
            email,
        }
    }

    /// The unencoded message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Link for a channel, if it is shown.
    pub fn get(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Messaging => self.messaging.as_deref(),
            Channel::Sms => self.sms.as_deref(),
            Channel::Email => self.email.as_deref(),
        }
    }

    /// Check if a channel's button is shown.
    pub fn is_visible(&self, channel: Channel) -> bool {
        self.get(channel).is_some()
    }

    /// Shown channels with their links, in display order.
    pub fn visible(&self) -> Vec<(Channel, &str)> {
        Channel::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|href| (c, href)))
            .collect()
    }
}

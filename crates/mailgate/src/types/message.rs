//! Outgoing message and send receipt.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message to hand to the messages endpoint.
///
/// The sender is not part of the message; it comes from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Recipient address, or a comma-separated list of addresses.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain text body.
    pub text: String,
}

impl OutgoingMessage {
    /// Creates a new outgoing message.
    #[must_use]
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
            text: text.into(),
        }
    }

    /// Form fields in the order the provider documents them.
    pub(crate) fn form<'a>(&'a self, from: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("to", self.to.as_str()),
            ("subject", self.subject.as_str()),
            ("from", from),
            ("html", self.html.as_str()),
            ("text", self.text.as_str()),
        ]
    }
}

/// Response from the messages endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Provider message ID, e.g. `<20240101.1@mg.example.com>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Status text, usually `Queued. Thank you.`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Remaining response fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

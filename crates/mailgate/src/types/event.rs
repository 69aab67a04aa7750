//! Event log types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event name for a successful delivery.
pub const DELIVERY_SUCCESS: &str = "delivered";

/// Event name for a permanent delivery failure.
pub const DELIVERY_FAILURE: &str = "failed";

/// Filter passed as the `event` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Delivered messages only.
    Delivered,
    /// Rejected or failed messages.
    Failed,
    /// Any provider filter expression, e.g. `opened OR clicked`.
    Custom(String),
}

impl EventFilter {
    /// Returns the filter expression sent to the provider.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Delivered => DELIVERY_SUCCESS,
            Self::Failed => "rejected OR failed",
            Self::Custom(expr) => expr,
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventFilter {
    fn from(expr: &str) -> Self {
        Self::Custom(expr.to_string())
    }
}

/// One entry of the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    /// Event name (`accepted`, `delivered`, `failed`, ...).
    pub event: String,
    /// Recipient address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Unix timestamp with fractional seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Remaining event fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the event log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    /// Events in the requested order.
    pub items: Vec<EventItem>,
    /// Links to neighbouring pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Map<String, Value>>,
}

impl EventPage {
    /// Returns the first event on the page, if any.
    #[must_use]
    pub fn first(&self) -> Option<&EventItem> {
        self.items.first()
    }

    /// Returns true if the first event on the page has the given name.
    #[must_use]
    pub fn first_is(&self, event: &str) -> bool {
        self.first().is_some_and(|item| item.event == event)
    }
}

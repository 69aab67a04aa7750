//! Address validation response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Validation status marking an address as invalid.
pub const STATUS_UNDELIVERABLE: &str = "undeliverable";

/// Response from the address validation endpoint.
///
/// Only `result` drives classification. Every field the provider sends is
/// kept, the unrecognised ones in [`extra`](Self::extra).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Validation verdict (`deliverable`, `undeliverable`, `risky`, `unknown`).
    ///
    /// `None` only when the key is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Address that was checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Risk assessment (`low`, `medium`, `high`, `unknown`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    /// Remaining response fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationResult {
    /// Returns the verdict if the provider sent it as a string.
    #[must_use]
    pub fn result_str(&self) -> Option<&str> {
        self.result.as_ref().and_then(Value::as_str)
    }

    /// Returns true unless the address is undeliverable.
    ///
    /// A response without `result` counts as invalid. Any other value of
    /// `result`, `null` included, counts as valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.result
            .as_ref()
            .is_some_and(|result| result.as_str() != Some(STATUS_UNDELIVERABLE))
    }
}

/// Keeps a present field as `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(json: &str) -> ValidationResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deliverable_is_valid() {
        assert!(parse(r#"{"result":"deliverable"}"#).is_valid());
    }

    #[test]
    fn test_undeliverable_is_invalid() {
        assert!(!parse(r#"{"result":"undeliverable"}"#).is_valid());
    }

    #[test]
    fn test_missing_result_is_invalid() {
        assert!(!parse("{}").is_valid());
        assert!(!parse(r#"{"message":"Invalid address"}"#).is_valid());
    }

    #[test]
    fn test_null_result_is_valid() {
        let result = parse(r#"{"result":null}"#);
        assert_eq!(result.result, Some(Value::Null));
        assert!(result.result_str().is_none());
        assert!(result.is_valid());
    }

    #[test]
    fn test_non_string_result_is_valid() {
        let result = parse(r#"{"result":1}"#);
        assert_eq!(result.result, Some(Value::from(1)));
        assert!(result.is_valid());
    }

    #[test]
    fn test_extra_fields_preserved() {
        let result = parse(
            r#"{
                "address": "user@example.com",
                "is_disposable_address": false,
                "is_role_address": false,
                "reason": [],
                "result": "deliverable",
                "risk": "low"
            }"#,
        );
        assert_eq!(result.result_str(), Some("deliverable"));
        assert_eq!(result.address.as_deref(), Some("user@example.com"));
        assert_eq!(result.risk.as_deref(), Some("low"));
        assert_eq!(result.extra.get("is_role_address"), Some(&Value::Bool(false)));
        assert!(!result.extra.contains_key("result"));
    }

    proptest! {
        #[test]
        fn prop_any_other_result_is_valid(status in "[a-z_]{0,16}") {
            prop_assume!(status != STATUS_UNDELIVERABLE);
            let result = ValidationResult {
                result: Some(Value::String(status)),
                ..ValidationResult::default()
            };
            prop_assert!(result.is_valid());
        }
    }
}

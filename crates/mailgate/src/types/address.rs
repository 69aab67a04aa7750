//! Sender address types.

use std::fmt;

use crate::error::{Error, Result};

/// Email address with basic syntax checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self(addr))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(addr: &str) -> Result<()> {
        if addr.is_empty() {
            return Err(Error::InvalidAddress("Address cannot be empty".into()));
        }

        if addr.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
            return Err(Error::InvalidAddress(format!(
                "Address contains forbidden characters: {addr}"
            )));
        }

        let Some((local, domain)) = addr.split_once('@') else {
            return Err(Error::InvalidAddress("Address must contain @".into()));
        };

        if domain.contains('@') {
            return Err(Error::InvalidAddress(
                "Address must have exactly one @".into(),
            ));
        }

        if local.is_empty() || domain.is_empty() {
            return Err(Error::InvalidAddress(
                "Local and domain parts cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sender mailbox: optional display name plus address.
///
/// Rendered as `Name <addr>` when a name is present, bare `addr` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: Address,
}

impl Mailbox {
    /// Creates a new mailbox with just an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: None,
            address: Address::new(address)?,
        })
    }

    /// Creates a new mailbox with a display name and address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: Some(name.into()),
            address: Address::new(address)?,
        })
    }
}

impl From<Address> for Mailbox {
    fn from(address: Address) -> Self {
        Self {
            name: None,
            address,
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) if name.contains([',', '"', '<', '>', '@']) => {
                write!(f, "\"{}\" <{}>", name.replace('"', "\\\""), self.address)
            }
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        let addr = Address::new("user@example.com").unwrap();
        assert_eq!(addr.as_str(), "user@example.com");
        assert_eq!(addr.to_string(), "user@example.com");
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(Address::new("").is_err());
        assert!(Address::new("userexample.com").is_err());
        assert!(Address::new("@example.com").is_err());
        assert!(Address::new("user@").is_err());
        assert!(Address::new("a@b@example.com").is_err());
        assert!(Address::new("user name@example.com").is_err());
        assert!(Address::new("<user@example.com>").is_err());
    }

    #[test]
    fn test_mailbox_display_bare() {
        let mailbox = Mailbox::new("a@x.com").unwrap();
        assert!(mailbox.name.is_none());
        assert_eq!(mailbox.to_string(), "a@x.com");
    }

    #[test]
    fn test_mailbox_display_named() {
        let mailbox = Mailbox::with_name("Support Team", "support@x.com").unwrap();
        assert_eq!(mailbox.to_string(), "Support Team <support@x.com>");
    }

    #[test]
    fn test_mailbox_display_quotes_specials() {
        let mailbox = Mailbox::with_name("Doe, Jane", "jane@x.com").unwrap();
        assert_eq!(mailbox.to_string(), "\"Doe, Jane\" <jane@x.com>");
    }

    #[test]
    fn test_mailbox_empty_name_renders_bare() {
        let mailbox = Mailbox::with_name("", "a@x.com").unwrap();
        assert_eq!(mailbox.to_string(), "a@x.com");
    }

    #[test]
    fn test_mailbox_from_address() {
        let mailbox = Mailbox::from(Address::new("a@x.com").unwrap());
        assert_eq!(mailbox.address.as_str(), "a@x.com");
    }
}

//! Client configuration types.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default number of polling attempts for delivery checks.
pub const DEFAULT_RETRY_LIMIT: u32 = 5;

/// Default pause after each polling attempt.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// API version used by the messages and events endpoints.
pub const SEND_API_VERSION: &str = "v3";

/// API version used by the address validation endpoint.
pub const VALIDATE_API_VERSION: &str = "v4";

/// Mailgun hosting region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// United States region.
    #[default]
    Us,
    /// European Union region.
    Eu,
}

impl Region {
    /// Returns the API base URL for this region.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Us => "https://api.mailgun.net",
            Self::Eu => "https://api.eu.mailgun.net",
        }
    }
}

/// Mailgun client configuration.
///
/// Immutable once built. The API key is only ever sent as the password half
/// of HTTP basic auth and is redacted from `Debug` output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Sending domain registered with Mailgun.
    pub domain: String,
    api_key: String,
    /// Maximum number of polling attempts.
    pub retry_limit: u32,
    /// Pause after each polling attempt.
    pub retry_interval: Duration,
    /// API base URL.
    pub base_url: Url,
    /// Version segment for the messages and events endpoints.
    pub send_api_version: String,
    /// Version segment for the validation endpoint.
    pub validate_api_version: String,
}

impl ClientConfig {
    /// Creates a configuration with default retry settings in the US region.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain or API key is empty.
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::builder(domain, api_key).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(domain: impl Into<String>, api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(domain, api_key)
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// URL of the address validation endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn validate_url(&self) -> Result<Url> {
        self.endpoint(&[&self.validate_api_version, "address", "validate"])
    }

    /// URL of the messages endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn messages_url(&self) -> Result<Url> {
        self.endpoint(&[&self.send_api_version, &self.domain, "messages"])
    }

    /// URL of the events endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn events_url(&self) -> Result<Url> {
        self.endpoint(&[&self.send_api_version, &self.domain, "events"])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("retry_limit", &self.retry_limit)
            .field("retry_interval", &self.retry_interval)
            .field("base_url", &self.base_url.as_str())
            .field("send_api_version", &self.send_api_version)
            .field("validate_api_version", &self.validate_api_version)
            .finish()
    }
}

/// Builder for client configuration.
#[derive(Clone)]
pub struct ClientConfigBuilder {
    domain: String,
    api_key: String,
    retry_limit: u32,
    retry_interval: Duration,
    region: Region,
    base_url: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder for the given domain and API key.
    #[must_use]
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            region: Region::Us,
            base_url: None,
        }
    }

    /// Sets the maximum number of polling attempts.
    #[must_use]
    pub const fn retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = limit;
        self
    }

    /// Sets the pause after each polling attempt.
    #[must_use]
    pub const fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Sets the hosting region.
    #[must_use]
    pub const fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Overrides the base URL. Takes precedence over the region.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain or API key is empty, the retry limit is
    /// zero, or the base URL does not parse.
    pub fn build(self) -> Result<ClientConfig> {
        if self.domain.trim().is_empty() {
            return Err(Error::InvalidConfig("domain is empty".into()));
        }
        if self.api_key.is_empty() {
            return Err(Error::InvalidConfig("api_key is empty".into()));
        }
        if self.retry_limit == 0 {
            return Err(Error::InvalidConfig("retry_limit must be at least 1".into()));
        }

        let base_url = Url::parse(
            self.base_url
                .as_deref()
                .unwrap_or_else(|| self.region.base_url()),
        )?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "{base_url} cannot be a base URL"
            )));
        }

        Ok(ClientConfig {
            domain: self.domain,
            api_key: self.api_key,
            retry_limit: self.retry_limit,
            retry_interval: self.retry_interval,
            base_url,
            send_api_version: SEND_API_VERSION.to_string(),
            validate_api_version: VALIDATE_API_VERSION.to_string(),
        })
    }
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("retry_limit", &self.retry_limit)
            .field("retry_interval", &self.retry_interval)
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("mg.example.com", "key-123").unwrap();
        assert_eq!(config.domain, "mg.example.com");
        assert_eq!(config.api_key(), "key-123");
        assert_eq!(config.retry_limit, 5);
        assert_eq!(config.retry_interval, Duration::from_secs(5));
        assert_eq!(config.base_url.as_str(), "https://api.mailgun.net/");
        assert_eq!(config.send_api_version, "v3");
        assert_eq!(config.validate_api_version, "v4");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ClientConfig::new("mg.example.com", "key-123").unwrap();
        assert_eq!(
            config.validate_url().unwrap().as_str(),
            "https://api.mailgun.net/v4/address/validate"
        );
        assert_eq!(
            config.messages_url().unwrap().as_str(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
        assert_eq!(
            config.events_url().unwrap().as_str(),
            "https://api.mailgun.net/v3/mg.example.com/events"
        );
    }

    #[test]
    fn test_eu_region() {
        let config = ClientConfig::builder("mg.example.com", "key-123")
            .region(Region::Eu)
            .build()
            .unwrap();
        assert_eq!(
            config.messages_url().unwrap().as_str(),
            "https://api.eu.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = ClientConfig::builder("mg.example.com", "key-123")
            .region(Region::Eu)
            .base_url("http://127.0.0.1:8080/proxy/")
            .build()
            .unwrap();
        assert_eq!(
            config.events_url().unwrap().as_str(),
            "http://127.0.0.1:8080/proxy/v3/mg.example.com/events"
        );
    }

    #[test]
    fn test_builder_retry_settings() {
        let config = ClientConfig::builder("mg.example.com", "key-123")
            .retry_limit(3)
            .retry_interval(Duration::from_millis(250))
            .build()
            .unwrap();
        assert_eq!(config.retry_limit, 3);
        assert_eq!(config.retry_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(ClientConfig::new("", "key-123").is_err());
        assert!(ClientConfig::new("mg.example.com", "").is_err());
        assert!(
            ClientConfig::builder("mg.example.com", "key-123")
                .retry_limit(0)
                .build()
                .is_err()
        );
        assert!(
            ClientConfig::builder("mg.example.com", "key-123")
                .base_url("not a url")
                .build()
                .is_err()
        );
        assert!(
            ClientConfig::builder("mg.example.com", "key-123")
                .base_url("mailto:ops@example.com")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("mg.example.com", "key-secret-value").unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("mg.example.com"));
        assert!(!debug.contains("key-secret-value"));

        let builder = ClientConfig::builder("mg.example.com", "key-secret-value");
        assert!(!format!("{builder:?}").contains("key-secret-value"));
    }
}

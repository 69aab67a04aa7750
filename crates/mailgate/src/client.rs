//! Mailgun API client.

use chrono::{DateTime, Duration, Utc};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::types::{
    DELIVERY_FAILURE, DELIVERY_SUCCESS, EventFilter, EventPage, Mailbox, OutgoingMessage,
    SendReceipt, ValidationResult,
};

/// Basic auth username expected by Mailgun.
const AUTH_USER: &str = "api";

/// Page size requested from the events endpoint.
const EVENTS_LIMIT: &str = "300";

/// How far back the events query looks.
const EVENTS_LOOKBACK_HOURS: i64 = 1;

/// Error body returned by Mailgun on non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the Mailgun validation, messages and events APIs.
///
/// Holds the configuration, an optional sender and a pooled HTTP client.
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    sender: Option<Mailbox>,
    http_client: reqwest::Client,
}

impl Client {
    /// Creates a client with default retry settings in the US region.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain or API key is empty.
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::with_config(ClientConfig::new(domain, api_key)?))
    }

    /// Creates a client from a prepared configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            sender: None,
            http_client: reqwest::Client::new(),
        }
    }

    /// Sets the sender address.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<Mailbox>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the sender address, if set.
    #[must_use]
    pub const fn sender(&self) -> Option<&Mailbox> {
        self.sender.as_ref()
    }

    /// Sets the sender address used for all subsequent sends.
    pub fn set_sender(&mut self, sender: impl Into<Mailbox>) {
        self.sender = Some(sender.into());
    }

    /// Unsets the sender address, returning the previous one.
    pub fn clear_sender(&mut self) -> Option<Mailbox> {
        self.sender.take()
    }

    /// Validates an address with the provider.
    ///
    /// Returns the response body as sent, whatever the status, as long as it
    /// is a JSON object. No retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON object.
    pub async fn validate(&self, address: &str) -> Result<ValidationResult> {
        tracing::debug!(address, "Validating address");
        let response = self
            .send_get(self.config.validate_url()?, &[("address", address)])
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(Into::into);
        }

        // Error bodies are still validation responses, just without a verdict.
        let body = response.text().await?;
        serde_json::from_str::<ValidationResult>(&body).map_err(|_| api_error(status, &body))
    }

    /// Returns true unless the provider reports the address undeliverable.
    ///
    /// A response without a `result` field counts as invalid, including a
    /// JSON error body from a rejected request.
    ///
    /// # Errors
    ///
    /// Returns an error if the validation request fails.
    pub async fn is_valid(&self, address: &str) -> Result<bool> {
        Ok(self.validate(address).await?.is_valid())
    }

    /// Sends a message from the configured sender.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSender`] if no sender is set, before any
    /// request is made. Otherwise returns an error if the request fails or
    /// the provider rejects it.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<SendReceipt> {
        self.send_message(&OutgoingMessage::new(to, subject, html, text))
            .await
    }

    /// Sends a prepared message from the configured sender.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<SendReceipt> {
        let from = self.sender.as_ref().ok_or(Error::MissingSender)?.to_string();

        tracing::debug!(to = %message.to, subject = %message.subject, "Sending message");

        let response = self
            .http_client
            .post(self.config.messages_url()?)
            .basic_auth(AUTH_USER, Some(self.config.api_key()))
            .form(&message.form(&from))
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Fetches the last hour of events for a recipient, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    pub async fn query_events(&self, address: &str, filter: &EventFilter) -> Result<EventPage> {
        let begin = lookback_start(Utc::now());
        tracing::debug!(address, %filter, %begin, "Querying events");

        self.get(
            self.config.events_url()?,
            &[
                ("begin", begin.as_str()),
                ("ascending", "yes"),
                ("limit", EVENTS_LIMIT),
                ("pretty", "yes"),
                ("event", filter.as_str()),
                ("recipient", address),
            ],
        )
        .await
    }

    /// Polls until the earliest matching event for `address` is a delivery.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not a connection reset.
    pub async fn is_delivered(&self, address: &str) -> Result<bool> {
        self.poll_first_event(address, &EventFilter::Delivered, DELIVERY_SUCCESS)
            .await
    }

    /// Polls until the earliest rejected-or-failed event for `address` is a failure.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not a connection reset.
    pub async fn is_failed(&self, address: &str) -> Result<bool> {
        self.poll_first_event(address, &EventFilter::Failed, DELIVERY_FAILURE)
            .await
    }

    /// Returns the polling policy derived from the configuration.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.config.retry_limit, self.config.retry_interval)
    }

    async fn poll_first_event(
        &self,
        address: &str,
        filter: &EventFilter,
        expected: &str,
    ) -> Result<bool> {
        self.retry_policy()
            .poll(move || async move {
                let page = self.query_events(address, filter).await?;
                Ok::<_, Error>(page.first_is(expected))
            })
            .await
    }

    async fn get<T, Q>(&self, url: Url, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send_get(url, query).await?;
        Self::parse(response).await
    }

    async fn send_get<Q>(&self, url: Url, query: &Q) -> Result<Response>
    where
        Q: Serialize + ?Sized,
    {
        self.http_client
            .get(url)
            .basic_auth(AUTH_USER, Some(self.config.api_key()))
            .query(query)
            .send()
            .await
            .map_err(Into::into)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }

        response.json().await.map_err(Into::into)
    }
}

/// Builds an API error from a non-success response body.
///
/// Uses the provider's `message` field when the body is JSON, the raw text otherwise.
fn api_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map_or_else(|_| body.trim().to_string(), |error| error.message);
    tracing::debug!(status = status.as_u16(), %message, "Mailgun API error");
    Error::api_error(status.as_u16(), message)
}

/// RFC 2822 timestamp marking the start of the events lookback window.
fn lookback_start(now: DateTime<Utc>) -> String {
    (now - Duration::hours(EVENTS_LOOKBACK_HOURS)).to_rfc2822()
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
    use crate::types::Address;
    use chrono::TimeZone;

    fn offline_client() -> Client {
        // Port 9 (discard): any request would fail, so tests prove no I/O happens.
        let config = ClientConfig::builder("mg.example.com", "key-123")
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        Client::with_config(config)
    }

    #[test]
    fn test_client_creation() {
        let client = Client::new("mg.example.com", "key-123").unwrap();
        assert_eq!(client.config().domain, "mg.example.com");
        assert!(client.sender().is_none());
        assert_eq!(client.retry_policy().limit, 5);
    }

    #[test]
    fn test_client_rejects_empty_key() {
        assert!(matches!(
            Client::new("mg.example.com", ""),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sender_accessors() {
        let mut client = offline_client();
        client.set_sender(Mailbox::new("a@x.com").unwrap());
        assert_eq!(client.sender().unwrap().to_string(), "a@x.com");

        let previous = client.clear_sender().unwrap();
        assert_eq!(previous.address.as_str(), "a@x.com");
        assert!(client.sender().is_none());

        let client = client.with_sender(Address::new("b@x.com").unwrap());
        assert_eq!(client.sender().unwrap().address.as_str(), "b@x.com");
    }

    #[tokio::test]
    async fn test_send_without_sender_fails() {
        let client = offline_client();
        let result = client.send("b@y.com", "Hello", "<p>Hi</p>", "Hi").await;
        assert!(matches!(result, Err(Error::MissingSender)));
    }

    #[test]
    fn test_lookback_start() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(lookback_start(now), "Tue, 5 Mar 2024 13:30:00 +0000");
    }

    #[test]
    fn test_lookback_start_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 0, 15, 0).unwrap();
        assert_eq!(lookback_start(now), "Mon, 4 Mar 2024 23:15:00 +0000");
    }
}

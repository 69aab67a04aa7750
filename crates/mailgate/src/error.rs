//! Error types for Mailgun API operations.

use std::error::Error as StdError;
use std::io;

/// Result type alias for Mailgun API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Mailgun client error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message was sent before a sender address was configured.
    #[error("\"From\" address is not set")]
    MissingSender,

    /// HTTP transport or response decoding error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Provider answered with a non-success status.
    #[error("Mailgun API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the provider.
        message: String,
    },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Returns true if the peer reset the connection somewhere below this error.
    ///
    /// The whole `source()` chain is searched, since `reqwest` wraps the
    /// underlying `io::Error` several layers deep.
    #[must_use]
    pub fn is_connection_reset(&self) -> bool {
        let mut source = self.source();
        while let Some(err) = source {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                if io_err.kind() == io::ErrorKind::ConnectionReset {
                    return true;
                }
                // A custom io::Error hides its payload from source().
                if let Some(inner) = io_err.get_ref() {
                    source = Some(inner as &(dyn StdError + 'static));
                    continue;
                }
            }
            source = err.source();
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_reset_io() {
        let err = Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
        assert!(err.is_connection_reset());
    }

    #[test]
    fn test_other_io_is_not_reset() {
        let err = Error::Io(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        assert!(!err.is_connection_reset());
    }

    #[test]
    fn test_nested_reset_is_found() {
        let inner = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        let outer = io::Error::other(inner);
        let err = Error::Io(outer);
        // Top-level kind is Other, but the cause is a reset.
        assert!(err.is_connection_reset());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api_error(401, "Forbidden");
        assert_eq!(err.to_string(), "Mailgun API error 401: Forbidden");
        assert!(!err.is_connection_reset());
    }

    #[test]
    fn test_missing_sender_display() {
        assert_eq!(Error::MissingSender.to_string(), "\"From\" address is not set");
    }
}

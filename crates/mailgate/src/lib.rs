//! # mailgate
//!
//! Async client for the Mailgun HTTP API.
//!
//! ## Features
//!
//! - **Address validation**: raw validation verdicts and a boolean shortcut
//! - **Sending**: HTML + text messages from a configured sender
//! - **Delivery tracking**: bounded polling of the events log for
//!   `delivered` / `failed` outcomes
//! - **Regions**: US and EU endpoints, or any base URL
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailgate::{Client, Mailbox};
//!
//! #[tokio::main]
//! async fn main() -> mailgate::Result<()> {
//!     let mut client = Client::new("mg.example.com", "key-...")?;
//!     client.set_sender(Mailbox::with_name("Example", "noreply@mg.example.com")?);
//!
//!     if client.is_valid("user@example.com").await? {
//!         client
//!             .send("user@example.com", "Welcome", "<p>Hello!</p>", "Hello!")
//!             .await?;
//!
//!         // Polls up to 5 times, 5 seconds apart.
//!         let delivered = client.is_delivered("user@example.com").await?;
//!         println!("delivered: {delivered}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Configuration
//!
//! ```ignore
//! use std::time::Duration;
//! use mailgate::{Client, ClientConfig, Region};
//!
//! let config = ClientConfig::builder("mg.example.com", "key-...")
//!     .region(Region::Eu)
//!     .retry_limit(10)
//!     .retry_interval(Duration::from_secs(2))
//!     .build()?;
//! let client = Client::with_config(config);
//! ```
//!
//! ## Polling
//!
//! [`Client::is_delivered`] and [`Client::is_failed`] query the last hour of
//! events for a recipient, oldest first, and look only at the first item.
//! Each attempt is followed by the configured pause. A connection reset
//! counts as one failed attempt; any other error ends the poll.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod config;
mod error;
pub mod retry;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, Region};
pub use error::{Error, Result};
pub use retry::{Attempt, RetryPolicy};
pub use types::{
    Address, DELIVERY_FAILURE, DELIVERY_SUCCESS, EventFilter, EventItem, EventPage, Mailbox,
    OutgoingMessage, STATUS_UNDELIVERABLE, SendReceipt, ValidationResult,
};

//! Request and response types for the Mailgun API.

mod address;
mod event;
mod message;
mod validation;

pub use address::{Address, Mailbox};
pub use event::{DELIVERY_FAILURE, DELIVERY_SUCCESS, EventFilter, EventItem, EventPage};
pub use message::{OutgoingMessage, SendReceipt};
pub use validation::{STATUS_UNDELIVERABLE, ValidationResult};

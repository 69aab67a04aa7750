//! Send a message and wait for its delivery outcome.
//!
//! Usage:
//! ```bash
//! MAILGUN_DOMAIN=mg.example.com MAILGUN_API_KEY=key-... \
//!     cargo run -p mailgate --example track_delivery -- noreply@mg.example.com user@example.com
//! ```

use std::env;

use mailgate::{Client, Mailbox};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mailgate=debug".parse()?))
        .init();

    let domain = env::var("MAILGUN_DOMAIN")?;
    let api_key = env::var("MAILGUN_API_KEY")?;

    let mut args = env::args().skip(1);
    let (Some(from), Some(to)) = (args.next(), args.next()) else {
        eprintln!("usage: track_delivery <from> <to>");
        std::process::exit(2);
    };

    let mut client = Client::new(domain, api_key)?;
    client.set_sender(Mailbox::new(from)?);

    if !client.is_valid(&to).await? {
        println!("{to} is undeliverable, not sending");
        return Ok(());
    }

    let receipt = client
        .send(
            &to,
            "Delivery check",
            "<p>This is a delivery check.</p>",
            "This is a delivery check.",
        )
        .await?;
    println!("Queued: {}", receipt.id.as_deref().unwrap_or("<no id>"));

    if client.is_delivered(&to).await? {
        println!("Delivered to {to}");
    } else if client.is_failed(&to).await? {
        println!("Delivery to {to} failed");
    } else {
        println!("No outcome for {to} yet");
    }

    Ok(())
}

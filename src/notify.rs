//! Digest delivery over authenticated SMTP.
//!
//! One email per run, submitted through the configured relay with
//! implicit-TLS submission and app-password credentials. Unlike every other
//! stage, delivery failures are fatal: the error propagates to `main` and
//! the process exits non-zero, leaving the next scheduled run to try again.

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error;
use tracing::{info, instrument};

/// Build the digest message.
///
/// Fails if either address does not parse or the message cannot be
/// assembled; both are configuration errors and fatal.
pub fn build_message(
    sender: &str,
    recipient: &str,
    subject: &str,
    html_body: String,
) -> Result<Message, Box<dyn Error>> {
    let from: Mailbox = sender.parse()?;
    let to: Mailbox = recipient.parse()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html_body)?;

    Ok(message)
}

/// Submit the rendered digest to the relay.
///
/// The sender address doubles as the SMTP username, matching the
/// app-password flow of consumer mail providers.
#[instrument(level = "info", skip_all, fields(%relay, %recipient))]
pub async fn send_digest(
    relay: &str,
    sender: &str,
    app_password: &str,
    recipient: &str,
    subject: &str,
    html_body: String,
) -> Result<(), Box<dyn Error>> {
    let message = build_message(sender, recipient, subject, html_body)?;

    let credentials = Credentials::new(sender.to_string(), app_password.to_string());
    let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)?
        .credentials(credentials)
        .build();

    let response = mailer.send(message).await?;
    info!(code = %response.code(), "Digest email submitted");
    Ok(())
}

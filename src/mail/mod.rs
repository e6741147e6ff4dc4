//! Delivery of alert emails.

mod webhook;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

pub use webhook::WebhookMailer;

/// Errors returned while sending an alert email.
#[derive(Debug, Error)]
pub enum MailError {
    /// The relay refused the message.
    #[error("Email rejected: {0}")]
    Rejected(String),

    /// The request could not be delivered.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest_middleware::Error),
}

/// A file attached to an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub filename: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// A fully rendered alert email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    /// The `From` address.
    pub sender: String,
    /// The `To` addresses.
    pub recipients: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Charset of both bodies.
    pub charset: String,
    /// Plain text body.
    pub body_text: String,
    /// HTML body.
    pub body_html: String,
    /// The captured image.
    pub attachment: Option<Attachment>,
}

/// Sends alert emails.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertMailer: Send + Sync {
    /// Sends `email`; `Ok` means the relay accepted it.
    async fn send(&self, email: &AlertEmail) -> Result<(), MailError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use url::Url;

use crate::mail::{AlertEmail, AlertMailer, MailError};

#[derive(Debug, Serialize)]
struct RelayAttachment<'a> {
    filename: &'a str,
    content_base64: String,
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    charset: &'a str,
    text: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<RelayAttachment<'a>>,
}

impl<'a> From<&'a AlertEmail> for RelayMessage<'a> {
    fn from(email: &'a AlertEmail) -> Self {
        let attachments = email
            .attachment
            .iter()
            .map(|a| RelayAttachment {
                filename: &a.filename,
                content_base64: STANDARD.encode(&a.content),
            })
            .collect();
        Self {
            from: &email.sender,
            to: &email.recipients,
            subject: &email.subject,
            charset: &email.charset,
            text: &email.body_text,
            html: &email.body_html,
            attachments,
        }
    }
}

/// Hands alert emails to an HTTP email relay as JSON documents.
#[derive(Debug)]
pub struct WebhookMailer {
    url: Url,
    client: Arc<ClientWithMiddleware>,
}

impl WebhookMailer {
    /// Creates a new WebhookMailer
    pub fn new(url: Url, client: Arc<ClientWithMiddleware>) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl AlertMailer for WebhookMailer {
    #[tracing::instrument(skip(self, email), fields(subject = %email.subject), level = "debug")]
    async fn send(&self, email: &AlertEmail) -> Result<(), MailError> {
        let message = RelayMessage::from(email);
        let response = self.client.post(self.url.clone()).json(&message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(format!("Email relay answered with status: {status}")));
        }

        tracing::info!(recipients = email.recipients.len(), "Alert email handed to relay.");
        Ok(())
    }
}

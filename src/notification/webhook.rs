//! Webhook notification implementation.
//!
//! Publishes `{topic, subject, message}` JSON documents to an HTTP endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use url::Url;

use crate::notification::{error::NotificationError, traits::Notifier};

#[derive(Debug, Serialize)]
struct Publication<'a> {
    topic: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Publishes notifications to a webhook.
#[derive(Debug)]
pub struct WebhookNotifier {
    /// Webhook URL for message delivery
    url: Url,
    /// Configured HTTP client for webhook requests with retry capabilities
    client: Arc<ClientWithMiddleware>,
}

impl WebhookNotifier {
    /// Creates a new Webhook notifier instance
    pub fn new(url: Url, client: Arc<ClientWithMiddleware>) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[tracing::instrument(skip(self, body), level = "debug")]
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let payload = Publication { topic, subject, message: body };
        let response = self.client.post(self.url.clone()).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::NotifyFailed(format!(
                "Webhook request failed with status: {status}"
            )));
        }

        tracing::debug!(topic, subject, "Notification published.");
        Ok(())
    }
}

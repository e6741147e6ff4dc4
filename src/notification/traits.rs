//! The publish contract used for out-of-band budget notifications.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::notification::error::NotificationError;

/// Fire-and-forget publication of a message on a topic.
///
/// Callers treat publication as best effort: an error is logged, never
/// turned into a gating decision.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publishes `body` with `subject` on `topic`.
    async fn publish(&self, topic: &str, subject: &str, body: &str)
    -> Result<(), NotificationError>;
}

use async_trait::async_trait;

use crate::notification::{error::NotificationError, traits::Notifier};

/// A notifier that prints publications to standard output.
#[derive(Debug, Default, Clone)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        println!("=== Notification [{topic}]: {subject} ===\n{body}\n");
        Ok(())
    }
}

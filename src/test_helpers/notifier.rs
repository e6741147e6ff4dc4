use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use crate::notification::{NotificationError, Notifier};

/// One recorded publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Topic published on.
    pub topic: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// A notifier keeping every publication in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    publications: Mutex<Vec<Publication>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following publication fail after being recorded.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All publications so far.
    pub fn publications(&self) -> Vec<Publication> {
        self.publications.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        self.publications.lock().unwrap_or_else(|e| e.into_inner()).push(Publication {
            topic: topic.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::NotifyFailed("recording notifier set to fail".into()));
        }
        Ok(())
    }
}

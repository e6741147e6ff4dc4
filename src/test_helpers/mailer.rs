use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use crate::mail::{AlertEmail, AlertMailer, MailError};

/// A mailer keeping every sent email in memory.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<AlertEmail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail without recording.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Emails sent successfully so far.
    pub fn sent(&self) -> Vec<AlertEmail> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AlertMailer for RecordingMailer {
    async fn send(&self, email: &AlertEmail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Rejected("recording mailer set to fail".to_string()));
        }
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(email.clone());
        Ok(())
    }
}

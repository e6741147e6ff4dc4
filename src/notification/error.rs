//! Error types for the notification collaborators.

use thiserror::Error;

/// Defines the possible errors that can occur while publishing a
/// notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// An error indicating that the notification failed to be sent.
    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    /// An error from the underlying `reqwest` or `reqwest_middleware`
    /// libraries.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest_middleware::Error),
}

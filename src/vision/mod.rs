//! Label detection on stored images.
//!
//! Detection is a metered external capability; every call must be gated by
//! the budget gate and accounted for after it succeeded.

mod http;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

pub use http::HttpLabelDetector;

use crate::models::LabelDetection;

/// Errors returned by a label detector.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The detector answered with a failure.
    #[error("Label detection failed: {0}")]
    DetectionFailed(String),

    /// The request could not be delivered.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest_middleware::Error),

    /// The detector's answer could not be decoded.
    #[error("Invalid detector response: {0}")]
    InvalidResponse(#[from] reqwest::Error),
}

/// Detects labels in an image held by object storage.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Returns at most `max_labels` labels with at least `min_confidence`
    /// percent confidence.
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: u32,
        min_confidence: f32,
    ) -> Result<LabelDetection, VisionError>;
}

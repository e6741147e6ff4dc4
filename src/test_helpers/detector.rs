use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    models::{DetectedLabel, LabelDetection},
    vision::{LabelDetector, VisionError},
};

/// A detector returning the same labels for every image.
#[derive(Debug, Default)]
pub struct StubLabelDetector {
    labels: Vec<String>,
    calls: AtomicUsize,
}

impl StubLabelDetector {
    /// Creates a detector reporting `labels` with 99% confidence.
    pub fn new(labels: &[&str]) -> Self {
        Self { labels: labels.iter().map(|l| l.to_string()).collect(), calls: AtomicUsize::new(0) }
    }

    /// Number of detections performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LabelDetector for StubLabelDetector {
    async fn detect_labels(
        &self,
        _bucket: &str,
        _key: &str,
        max_labels: u32,
        _min_confidence: f32,
    ) -> Result<LabelDetection, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let labels = self
            .labels
            .iter()
            .take(max_labels as usize)
            .map(|name| DetectedLabel { name: name.clone(), confidence: 99.0, instances: vec![] })
            .collect();
        Ok(LabelDetection { labels, label_model_version: None })
    }
}

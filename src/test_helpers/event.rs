//! Builders for inbound events and classification documents.

use crate::models::{
    ClassificationOutput, ClassificationRecord, DetectedLabel, LabelDetection, ObjectCreatedEvent,
};

/// An object-created event for `bucket/key`.
pub fn object_created_event(bucket: &str, key: &str) -> ObjectCreatedEvent {
    ObjectCreatedEvent::new(bucket, key, "2024-06-15T09:30:00.000Z")
}

/// A builder for creating `ClassificationOutput` instances for testing.
#[derive(Debug, Clone)]
pub struct ClassificationOutputBuilder {
    source_bucket: String,
    source_key: String,
    output_bucket: String,
    output_key: String,
    event_time: String,
    labels: Vec<String>,
}

impl Default for ClassificationOutputBuilder {
    fn default() -> Self {
        Self {
            source_bucket: "cams".to_string(),
            source_key: "front/2024-06-15-09-30-00-cam1.jpg".to_string(),
            output_bucket: "cams-output".to_string(),
            output_key: "classification/2024-06-15-09-30-00-cam1.jpg.json".to_string(),
            event_time: "2024-06-15T09:30:00.000Z".to_string(),
            labels: Vec::new(),
        }
    }
}

impl ClassificationOutputBuilder {
    /// Creates a new `ClassificationOutputBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the classified image.
    pub fn source(mut self, bucket: &str, key: &str) -> Self {
        self.source_bucket = bucket.to_string();
        self.source_key = key.to_string();
        self
    }

    /// Sets where the document is stored.
    pub fn output(mut self, bucket: &str, key: &str) -> Self {
        self.output_bucket = bucket.to_string();
        self.output_key = key.to_string();
        self
    }

    /// Sets the event time.
    pub fn event_time(mut self, event_time: &str) -> Self {
        self.event_time = event_time.to_string();
        self
    }

    /// Sets the detected labels.
    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Builds the `ClassificationOutput` with the provided values.
    pub fn build(self) -> ClassificationOutput {
        let detection = LabelDetection {
            labels: self
                .labels
                .iter()
                .map(|name| DetectedLabel { name: name.clone(), confidence: 99.0, instances: vec![] })
                .collect(),
            label_model_version: None,
        };
        ClassificationOutput {
            source_event: ObjectCreatedEvent::new(
                self.source_bucket.as_str(),
                self.source_key.as_str(),
                self.event_time.as_str(),
            ),
            classification: ClassificationRecord {
                s3_bucket_name_src: self.source_bucket,
                s3_object_key_src: self.source_key,
                s3_bucket_name_dst: self.output_bucket,
                s3_object_key_dst: self.output_key,
                event_time: self.event_time,
                classification_time: "2024-06-15T09:30:01.000000Z".to_string(),
                max_labels: 10,
                min_confidence: 75.0,
                labels: self.labels,
            },
            detection,
        }
    }
}

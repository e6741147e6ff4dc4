//! Label detection results and the classification output document.

use serde::{Deserialize, Serialize};

use crate::models::event::ObjectCreatedEvent;

/// Bounding box of one label instance, as ratios of the image size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Width ratio.
    pub width: f64,
    /// Height ratio.
    pub height: f64,
    /// Left coordinate ratio.
    pub left: f64,
    /// Top coordinate ratio.
    pub top: f64,
}

/// One occurrence of a label in the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelInstance {
    /// Where the instance is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Confidence of this instance, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A label returned by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectedLabel {
    /// Label name, e.g. `Person`.
    pub name: String,
    /// Confidence, percent.
    pub confidence: f64,
    /// Located occurrences; empty for scene-level labels.
    #[serde(default)]
    pub instances: Vec<LabelInstance>,
}

impl DetectedLabel {
    /// `'Name' (97.12%, #2)`
    pub fn summary(&self) -> String {
        format!("'{}' ({:.2}%, #{})", self.name, self.confidence, self.instances.len())
    }
}

/// The detector response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelDetection {
    /// Detected labels, most confident first.
    pub labels: Vec<DetectedLabel>,
    /// Version of the detection model, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_model_version: Option<String>,
}

impl LabelDetection {
    /// Label names in detector order.
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|label| label.name.clone()).collect()
    }

    /// Comma separated label summaries for logging.
    pub fn summary(&self) -> String {
        self.labels.iter().map(DetectedLabel::summary).collect::<Vec<_>>().join(", ")
    }
}

/// Where a classification came from and where it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Bucket of the classified image.
    pub s3_bucket_name_src: String,
    /// Key of the classified image.
    pub s3_object_key_src: String,
    /// Bucket of the output document.
    pub s3_bucket_name_dst: String,
    /// Key of the output document.
    pub s3_object_key_dst: String,
    /// Creation time of the image, from the inbound event.
    #[serde(rename = "eventTime")]
    pub event_time: String,
    /// When the classification ran, UTC ISO-8601.
    #[serde(rename = "classificationTime")]
    pub classification_time: String,
    /// Label limit requested.
    #[serde(rename = "MaxLabels")]
    pub max_labels: u32,
    /// Confidence floor requested.
    #[serde(rename = "MinConfidence")]
    pub min_confidence: f32,
    /// Detected label names.
    pub labels: Vec<String>,
}

impl ClassificationRecord {
    /// Case-insensitive intersection of the detected labels with `alert_labels`,
    /// in detection order.
    pub fn alert_labels_found(&self, alert_labels: &[String]) -> Vec<String> {
        let wanted: Vec<String> = alert_labels.iter().map(|l| l.to_lowercase()).collect();
        self.labels.iter().filter(|label| wanted.contains(&label.to_lowercase())).cloned().collect()
    }
}

/// The document stored for every classified image.
///
/// Serializes to one JSON object holding `Classification`, the inbound
/// event's `Records` and the detector's `Labels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutput {
    /// Summary consumed by the alert handler.
    #[serde(rename = "Classification")]
    pub classification: ClassificationRecord,
    /// The event that triggered the classification.
    #[serde(flatten)]
    pub source_event: ObjectCreatedEvent,
    /// The raw detector response.
    #[serde(flatten)]
    pub detection: LabelDetection,
}

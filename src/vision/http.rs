use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use url::Url;

use crate::{
    models::LabelDetection,
    vision::{LabelDetector, VisionError},
};

#[derive(Debug, Serialize)]
struct DetectionRequest<'a> {
    bucket: &'a str,
    key: &'a str,
    max_labels: u32,
    min_confidence: f32,
}

/// Calls a label detection service over HTTP.
#[derive(Debug)]
pub struct HttpLabelDetector {
    url: Url,
    client: Arc<ClientWithMiddleware>,
    timeout: Duration,
}

impl HttpLabelDetector {
    /// Creates a new HttpLabelDetector
    pub fn new(url: Url, client: Arc<ClientWithMiddleware>, timeout: Duration) -> Self {
        Self { url, client, timeout }
    }
}

#[async_trait]
impl LabelDetector for HttpLabelDetector {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: u32,
        min_confidence: f32,
    ) -> Result<LabelDetection, VisionError> {
        let request = DetectionRequest { bucket, key, max_labels, min_confidence };
        let response = self
            .client
            .post(self.url.clone())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::DetectionFailed(format!(
                "Detector request failed with status: {status}"
            )));
        }

        let detection: LabelDetection = response.json().await?;
        tracing::debug!(labels = detection.labels.len(), "Labels detected.");
        Ok(detection)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn detector(server: &mockito::Server) -> HttpLabelDetector {
        let client =
            Arc::new(reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build());
        HttpLabelDetector::new(Url::parse(&server.url()).unwrap(), client, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_detect_labels_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!({
                "bucket": "cams",
                "key": "front/img.jpg",
                "max_labels": 10,
                "min_confidence": 75.0
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "Labels": [
                        {"Name": "Person", "Confidence": 99.1, "Instances": [{"Confidence": 99.1}]},
                        {"Name": "Outdoors", "Confidence": 80.5}
                    ],
                    "LabelModelVersion": "3.0"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let detection =
            detector(&server).detect_labels("cams", "front/img.jpg", 10, 75.0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(detection.label_names(), vec!["Person", "Outdoors"]);
        assert_eq!(detection.labels[0].instances.len(), 1);
        assert!(detection.labels[1].instances.is_empty());
    }

    #[tokio::test]
    async fn test_detect_labels_reports_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/").with_status(400).create_async().await;

        let result = detector(&server).detect_labels("cams", "img.jpg", 10, 75.0).await;

        assert!(matches!(result, Err(VisionError::DetectionFailed(_))));
    }

    #[tokio::test]
    async fn test_detect_labels_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock =
            server.mock("POST", "/").with_status(200).with_body("not json").create_async().await;

        let result = detector(&server).detect_labels("cams", "img.jpg", 10, 75.0).await;

        assert!(matches!(result, Err(VisionError::InvalidResponse(_))));
    }
}

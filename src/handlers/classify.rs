use std::sync::Arc;

use crate::{
    clock::Clock,
    config::ClassificationConfig,
    engine::CoordinationPolicy,
    handlers::{HandlerError, basename},
    models::{
        ClassificationOutput, ClassificationRecord, HandlerResponse, ObjectCreatedEvent, Verdict,
    },
    persistence::traits::QuotaStore,
    storage::ObjectStore,
    vision::LabelDetector,
};

/// Classifies newly stored images within the monthly call budget and writes
/// one classification document per image.
pub struct ClassificationHandler<S: QuotaStore> {
    policy: Arc<CoordinationPolicy<S>>,
    detector: Arc<dyn LabelDetector>,
    objects: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    config: ClassificationConfig,
}

impl<S: QuotaStore> ClassificationHandler<S> {
    /// Creates a new ClassificationHandler
    pub fn new(
        policy: Arc<CoordinationPolicy<S>>,
        detector: Arc<dyn LabelDetector>,
        objects: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        config: ClassificationConfig,
    ) -> Self {
        Self { policy, detector, objects, clock, config }
    }

    /// Handles one object-created event.
    ///
    /// Responds 409 when the budget gate denies the call. The counter is
    /// incremented only once detection succeeded; a detection failure aborts
    /// the invocation without accounting the call.
    #[tracing::instrument(skip_all, level = "info")]
    pub async fn handle(&self, event: &ObjectCreatedEvent) -> Result<HandlerResponse, HandlerError> {
        let source = event
            .first_object()
            .ok_or_else(|| HandlerError::InvalidEvent("event holds no record".to_string()))?;
        let now = self.clock.now();
        let classification_time =
            format!("{}Z", self.clock.now_utc().format("%Y-%m-%dT%H:%M:%S%.6f"));
        tracing::info!(bucket = %source.bucket, object = %source.key, "Classifying image.");

        let decision = self.policy.budget_check(now).await?;
        if let Verdict::Denied(cause) = &decision.verdict {
            let message = format!(
                "File '{}/{}' NOT processed, not validated: '{}'",
                source.bucket, source.key, cause
            );
            tracing::info!("{message}");
            return Ok(HandlerResponse::conflict(message));
        }

        let detection = self
            .detector
            .detect_labels(
                &source.bucket,
                &source.key,
                self.config.max_labels,
                self.config.min_confidence,
            )
            .await?;
        tracing::info!(
            "Detected labels for '{}/{}': {}",
            source.bucket,
            source.key,
            detection.summary()
        );

        self.policy.budget_increment(now, None).await?;

        let record = ClassificationRecord {
            s3_bucket_name_src: source.bucket.clone(),
            s3_object_key_src: source.key.clone(),
            s3_bucket_name_dst: self.config.output_bucket.clone(),
            s3_object_key_dst: format!("{}{}.json", self.config.output_folder, basename(&source.key)),
            event_time: source.event_time.clone(),
            classification_time,
            max_labels: self.config.max_labels,
            min_confidence: self.config.min_confidence,
            labels: detection.label_names(),
        };
        let destination = format!("{}/{}", record.s3_bucket_name_dst, record.s3_object_key_dst);
        let output =
            ClassificationOutput { classification: record, source_event: event.clone(), detection };

        self.objects
            .put(
                &output.classification.s3_bucket_name_dst,
                &output.classification.s3_object_key_dst,
                serde_json::to_vec(&output)?,
            )
            .await?;
        tracing::info!(destination, "Classification document written.");

        Ok(HandlerResponse::ok(format!(
            "File '{}/{}' processed, file '{}' created, OK!",
            source.bucket, source.key, destination
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        config::StoreKeys,
        models::{DetectedLabel, LabelDetection},
        notification::traits::MockNotifier,
        persistence::traits::MockQuotaStore,
        storage::traits::MockObjectStore,
        test_helpers::FixedClock,
        vision::{MockLabelDetector, VisionError},
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn config() -> ClassificationConfig {
        ClassificationConfig {
            output_bucket: "cams-output".to_string(),
            output_folder: "classification/".to_string(),
            max_labels: 10,
            min_confidence: 75.0,
            detector_url: "http://localhost:9000/detect".parse().unwrap(),
            detector_timeout: std::time::Duration::from_secs(5),
        }
    }

    /// Budget store at `count` calls with thresholds 50/100 and the flag unset.
    fn quota_store(count: i64) -> MockQuotaStore {
        let mut store = MockQuotaStore::new();
        store.expect_get_flag().returning(|_| Ok(false));
        store.expect_create_integer_if_absent().returning(|_, _| Ok(false));
        store.expect_get_integer().returning(move |key| match key {
            "rekognition_api_calls_month_max_50" => Ok(50),
            "rekognition_api_calls_month_max_100" => Ok(100),
            _ => Ok(count),
        });
        store
    }

    fn handler(
        store: MockQuotaStore,
        detector: MockLabelDetector,
        objects: MockObjectStore,
    ) -> ClassificationHandler<MockQuotaStore> {
        let policy = CoordinationPolicy::new(
            Arc::new(store),
            StoreKeys::default(),
            Arc::new(MockNotifier::new()),
            "budget",
        );
        ClassificationHandler::new(
            Arc::new(policy),
            Arc::new(detector),
            Arc::new(objects),
            Arc::new(FixedClock::new(now())),
            config(),
        )
    }

    fn event() -> ObjectCreatedEvent {
        ObjectCreatedEvent::new("cams", "front/2024-06-15-09-30-00-cam1.jpg", "2024-06-15T09:30:00Z")
    }

    #[tokio::test]
    async fn test_exceeded_budget_responds_conflict_without_detection() {
        let mut store = quota_store(100);
        store.expect_put_integer().never();
        let mut detector = MockLabelDetector::new();
        detector.expect_detect_labels().never();
        let mut objects = MockObjectStore::new();
        objects.expect_put().never();

        let response = handler(store, detector, objects).handle(&event()).await.unwrap();

        assert_eq!(response.status_code, 409);
        assert!(response.body.contains("NOT processed"));
        assert!(response.body.contains("monthly call budget exceeded"));
    }

    #[tokio::test]
    async fn test_detection_failure_does_not_increment() {
        let mut store = quota_store(10);
        store.expect_put_integer().never();
        let mut detector = MockLabelDetector::new();
        detector
            .expect_detect_labels()
            .returning(|_, _, _, _| Err(VisionError::DetectionFailed("boom".to_string())));

        let result = handler(store, detector, MockObjectStore::new()).handle(&event()).await;

        assert!(matches!(result, Err(HandlerError::Vision(_))));
    }

    #[tokio::test]
    async fn test_permitted_call_increments_and_writes_document() {
        let mut store = quota_store(10);
        store
            .expect_put_integer()
            .with(eq("rekognition_api_calls_2024_06"), eq(11i64))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut detector = MockLabelDetector::new();
        detector
            .expect_detect_labels()
            .with(eq("cams"), eq("front/2024-06-15-09-30-00-cam1.jpg"), eq(10u32), eq(75.0f32))
            .returning(|_, _, _, _| {
                Ok(LabelDetection {
                    labels: vec![DetectedLabel {
                        name: "Person".to_string(),
                        confidence: 99.0,
                        instances: vec![],
                    }],
                    label_model_version: None,
                })
            });
        let mut objects = MockObjectStore::new();
        objects
            .expect_put()
            .withf(|bucket, key, body| {
                let doc: serde_json::Value = serde_json::from_slice(body).unwrap();
                bucket == "cams-output"
                    && key == "classification/2024-06-15-09-30-00-cam1.jpg.json"
                    && doc["Classification"]["labels"][0] == "Person"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let response = handler(store, detector, objects).handle(&event()).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("cams-output/classification/2024-06-15-09-30-00-cam1.jpg.json"));
    }

    #[tokio::test]
    async fn test_event_without_records_is_invalid() {
        let handler = handler(MockQuotaStore::new(), MockLabelDetector::new(), MockObjectStore::new());

        let result = handler.handle(&ObjectCreatedEvent { records: vec![] }).await;

        assert!(matches!(result, Err(HandlerError::InvalidEvent(_))));
    }
}

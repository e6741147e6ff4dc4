use std::sync::Arc;

use crate::{
    archive::{ArchiveJob, MonthlyArchiver},
    clock::Clock,
    config::ArchiveConfig,
    handlers::HandlerError,
    models::{ArchiveRequest, HandlerResponse},
    storage::ObjectStore,
};

/// Bundles past months of a configured capture directory on request.
pub struct ArchiveHandler {
    archiver: MonthlyArchiver,
    clock: Arc<dyn Clock>,
    config: ArchiveConfig,
}

impl ArchiveHandler {
    /// Creates a new ArchiveHandler
    pub fn new(objects: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>, config: ArchiveConfig) -> Self {
        Self { archiver: MonthlyArchiver::new(objects), clock, config }
    }

    fn rejection(&self) -> HandlerResponse {
        let accepted: Vec<String> = self
            .config
            .targets
            .iter()
            .map(|t| format!("{{bucket_name: {}, main_dir: {}}}", t.bucket_name, t.main_dir))
            .collect();
        HandlerResponse::bad_request(format!(
            "event json NOT valid, you must specify an event json with the structure: \
             {{\"custom_event\": {{\"bucket_name\": str, \"main_dir\": str}}}}, \
             and it has to be one of: [{}]",
            accepted.join(", ")
        ))
    }

    /// Handles one archive request.
    ///
    /// Responds 400 unless the request names exactly one of the configured
    /// targets, 200 once every configured month offset was processed.
    #[tracing::instrument(skip_all, level = "info")]
    pub async fn handle(&self, event: &serde_json::Value) -> Result<HandlerResponse, HandlerError> {
        tracing::info!(%event, "Received archive request.");

        let request = match serde_json::from_value::<ArchiveRequest>(event.clone()) {
            Ok(request) => request.custom_event,
            Err(e) => {
                tracing::info!(error = %e, "Malformed archive request.");
                return Ok(self.rejection());
            }
        };
        let known = self
            .config
            .targets
            .iter()
            .any(|t| t.bucket_name == request.bucket_name && t.main_dir == request.main_dir);
        if !known {
            tracing::info!(bucket = %request.bucket_name, main_dir = %request.main_dir, "Unknown archive target.");
            return Ok(self.rejection());
        }

        let job = ArchiveJob::monthly(&request.bucket_name, &request.main_dir);
        let reports = self
            .archiver
            .zip_months_ago(&job, self.clock.now(), &self.config.months_ago, self.config.delete_files)
            .await?;

        let archived: usize = reports.iter().map(|r| r.archived.len()).sum();
        tracing::info!(months = reports.len(), archived, "Archive request done.");
        Ok(HandlerResponse::ok(format!("OK! {archived} file(s) archived")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::{config::ArchiveTarget, storage::traits::MockObjectStore, test_helpers::FixedClock};

    fn handler(objects: MockObjectStore) -> ArchiveHandler {
        let config = ArchiveConfig {
            targets: vec![ArchiveTarget {
                bucket_name: "cams".to_string(),
                main_dir: "front".to_string(),
            }],
            months_ago: vec![1],
            delete_files: true,
        };
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        ArchiveHandler::new(Arc::new(objects), Arc::new(FixedClock::new(now)), config)
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected() {
        let mut objects = MockObjectStore::new();
        objects.expect_list().never();
        let handler = handler(objects);

        for event in [
            json!({}),
            json!({"custom_event": {"bucket_name": "cams"}}),
            json!({"custom_event": {"bucket_name": "cams", "main_dir": "back"}}),
            json!({"custom_event": {"bucket_name": "cams", "main_dir": "front", "extra": 1}}),
        ] {
            let response = handler.handle(&event).await.unwrap();
            assert_eq!(response.status_code, 400, "event {event} should be rejected");
            assert!(response.body.contains("bucket_name: cams, main_dir: front"));
        }
    }

    #[tokio::test]
    async fn test_known_target_is_archived() {
        let mut objects = MockObjectStore::new();
        objects.expect_list().returning(|_, prefix| {
            assert_eq!(prefix, "front/2024-05-");
            Ok(vec![])
        });

        let response = handler(objects)
            .handle(&json!({"custom_event": {"bucket_name": "cams", "main_dir": "front"}}))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "OK! 0 file(s) archived");
    }
}

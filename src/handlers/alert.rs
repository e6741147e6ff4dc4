use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    clock::Clock,
    config::AlertConfig,
    engine::CoordinationPolicy,
    handlers::{HandlerError, basename},
    mail::{AlertEmail, AlertMailer, Attachment},
    models::{ClassificationRecord, HandlerResponse, ObjectCreatedEvent},
    notification::{TemplateService, template::human_time},
    persistence::traits::QuotaStore,
    storage::ObjectStore,
};

/// The part of a classification document the alert handler needs.
#[derive(Debug, Deserialize)]
struct ClassificationDocument {
    #[serde(rename = "Classification")]
    classification: ClassificationRecord,
}

/// Emails an alert, at most once per cooldown period, when a classification
/// holds one of the configured labels.
pub struct AlertHandler<S: QuotaStore> {
    policy: Arc<CoordinationPolicy<S>>,
    objects: Arc<dyn ObjectStore>,
    mailer: Arc<dyn AlertMailer>,
    templates: TemplateService,
    clock: Arc<dyn Clock>,
    config: AlertConfig,
}

impl<S: QuotaStore> AlertHandler<S> {
    /// Creates a new AlertHandler
    pub fn new(
        policy: Arc<CoordinationPolicy<S>>,
        objects: Arc<dyn ObjectStore>,
        mailer: Arc<dyn AlertMailer>,
        clock: Arc<dyn Clock>,
        config: AlertConfig,
    ) -> Self {
        Self { policy, objects, mailer, templates: TemplateService::new(), clock, config }
    }

    /// Handles one event announcing a classification document.
    ///
    /// Responds 409 while the cooldown runs, 200 when no alert label was
    /// found or the email was sent, and 502 when the email could not be sent.
    /// The cooldown restarts only after a successful send.
    #[tracing::instrument(skip_all, level = "info")]
    pub async fn handle(&self, event: &ObjectCreatedEvent) -> Result<HandlerResponse, HandlerError> {
        let source = event
            .first_object()
            .ok_or_else(|| HandlerError::InvalidEvent("event holds no record".to_string()))?;

        let status = self.policy.cooldown_check(self.clock.now()).await?;
        if !status.permitted() {
            let message = format!("NOT checking new alerts BEFORE {status}");
            tracing::info!("{message}");
            return Ok(HandlerResponse::conflict(message));
        }
        tracing::info!("Checking new alerts after {status}");

        let raw = self.objects.get(&source.bucket, &source.key).await?;
        let record = serde_json::from_slice::<ClassificationDocument>(&raw)?.classification;
        tracing::info!(
            src = %format!("{}/{}", record.s3_bucket_name_src, record.s3_object_key_src),
            labels = ?record.labels,
            labels_alert = ?self.config.labels,
            "Loaded classification."
        );

        let found = record.alert_labels_found(&self.config.labels);
        if found.is_empty() {
            let message = format!(
                "label alerts ({:?}) NOT found in labels ({:?}), NO alert, OK!",
                self.config.labels, record.labels
            );
            tracing::info!("{message}");
            return Ok(HandlerResponse::ok(message));
        }
        let summary = format!("label alerts found ({found:?}) in labels, ALERT !!!");
        tracing::info!("{summary}");

        let email = self.build_email(&record, &found).await?;
        match self.mailer.send(&email).await {
            Ok(()) => {
                self.policy.record_alert_sent(self.clock.now()).await?;
                Ok(HandlerResponse::ok(format!("Email sent, OK!: ({summary})")))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send alert email.");
                Ok(HandlerResponse::bad_gateway(format!("Email NOT sent: {e}")))
            }
        }
    }

    async fn build_email(
        &self,
        record: &ClassificationRecord,
        found: &[String],
    ) -> Result<AlertEmail, HandlerError> {
        let email = &self.config.email;
        let context = json!({
            "labels_alert_found": found.join(","),
            "event_time": human_time(record.event_time.clone()),
        });
        let body_text = self.templates.render(&email.body_text_template, context.clone())?;
        let body_html = self.templates.render(&email.body_html_template, context)?;

        let content =
            self.objects.get(&record.s3_bucket_name_src, &record.s3_object_key_src).await?;
        tracing::debug!(sender = %email.sender, recipients = ?email.recipients, subject = %email.subject);

        Ok(AlertEmail {
            sender: email.sender.clone(),
            recipients: email.recipients.clone(),
            subject: email.subject.clone(),
            charset: email.charset.clone(),
            body_text,
            body_html,
            attachment: Some(Attachment {
                filename: basename(&record.s3_object_key_src).to_string(),
                content,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::*;
    use crate::{
        config::{EmailConfig, StoreKeys},
        mail::{MailError, MockAlertMailer},
        notification::traits::MockNotifier,
        persistence::traits::MockQuotaStore,
        storage::traits::MockObjectStore,
        test_helpers::FixedClock,
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn config() -> AlertConfig {
        AlertConfig {
            labels: vec!["Person".to_string()],
            email: EmailConfig {
                sender: "Alerts <alerts@example.com>".to_string(),
                recipients: vec!["one@example.com".to_string()],
                subject: "Alert".to_string(),
                charset: "utf-8".to_string(),
                body_text_template: "{{ labels_alert_found }} at {{ event_time }}".to_string(),
                body_html_template: "<b>{{ labels_alert_found }}</b>".to_string(),
                relay_url: "http://localhost:9001/send".parse().unwrap(),
            },
        }
    }

    /// Cooldown store with a period of 300 s and the last alert `elapsed`
    /// seconds ago.
    fn quota_store(elapsed: i64) -> MockQuotaStore {
        let mut store = MockQuotaStore::new();
        store.expect_get_integer().returning(|_| Ok(300));
        store.expect_get_timestamp().returning(move |_, _| Ok(now() - Duration::seconds(elapsed)));
        store
    }

    fn document(labels: &[&str]) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "Classification": {
                "s3_bucket_name_src": "cams",
                "s3_object_key_src": "front/2024-06-15-09-30-00-cam1.jpg",
                "s3_bucket_name_dst": "cams-output",
                "s3_object_key_dst": "classification/2024-06-15-09-30-00-cam1.jpg.json",
                "eventTime": "2024-06-15T09:30:00Z",
                "classificationTime": "2024-06-15T09:30:01.000000Z",
                "MaxLabels": 10,
                "MinConfidence": 75.0,
                "labels": labels
            },
            "Records": [],
            "Labels": []
        }))
        .unwrap()
    }

    fn objects(labels: &'static [&'static str]) -> MockObjectStore {
        let mut objects = MockObjectStore::new();
        objects
            .expect_get()
            .withf(|bucket, _| bucket == "cams-output")
            .returning(move |_, _| Ok(document(labels)));
        objects
            .expect_get()
            .withf(|bucket, key| bucket == "cams" && key == "front/2024-06-15-09-30-00-cam1.jpg")
            .returning(|_, _| Ok(b"jpeg".to_vec()));
        objects
    }

    fn handler(
        store: MockQuotaStore,
        objects: MockObjectStore,
        mailer: MockAlertMailer,
    ) -> AlertHandler<MockQuotaStore> {
        let policy = CoordinationPolicy::new(
            Arc::new(store),
            StoreKeys::default(),
            Arc::new(MockNotifier::new()),
            "budget",
        );
        AlertHandler::new(
            Arc::new(policy),
            Arc::new(objects),
            Arc::new(mailer),
            Arc::new(FixedClock::new(now())),
            config(),
        )
    }

    fn event() -> ObjectCreatedEvent {
        ObjectCreatedEvent::new(
            "cams-output",
            "classification/2024-06-15-09-30-00-cam1.jpg.json",
            "2024-06-15T09:30:01Z",
        )
    }

    #[tokio::test]
    async fn test_active_cooldown_responds_conflict() {
        let mut objects = MockObjectStore::new();
        objects.expect_get().never();

        let response = handler(quota_store(10), objects, MockAlertMailer::new())
            .handle(&event())
            .await
            .unwrap();

        assert_eq!(response.status_code, 409);
        assert!(response.body.starts_with("NOT checking new alerts BEFORE alert period (300 s)"));
    }

    #[tokio::test]
    async fn test_no_alert_label_sends_nothing() {
        let mut store = quota_store(600);
        store.expect_put_timestamp().never();
        let mut mailer = MockAlertMailer::new();
        mailer.expect_send().never();

        let response =
            handler(store, objects(&["Tree", "Car"]), mailer).handle(&event()).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("NO alert"));
    }

    #[tokio::test]
    async fn test_alert_sends_email_and_records_cooldown() {
        let mut store = quota_store(600);
        store
            .expect_put_timestamp()
            .withf(|key, value, _| key == "alerts_cams_img_last" && *value == now())
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut mailer = MockAlertMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.body_text == "person at 2024-06-15 09:30:00 "
                    && email.attachment.as_ref().is_some_and(|a| {
                        a.filename == "2024-06-15-09-30-00-cam1.jpg" && a.content == b"jpeg"
                    })
            })
            .times(1)
            .returning(|_| Ok(()));

        let response =
            handler(store, objects(&["Tree", "person"]), mailer).handle(&event()).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.body.starts_with("Email sent, OK!"));
    }

    #[tokio::test]
    async fn test_failed_send_keeps_cooldown_open() {
        let mut store = quota_store(600);
        store.expect_put_timestamp().never();
        let mut mailer = MockAlertMailer::new();
        mailer.expect_send().returning(|_| Err(MailError::Rejected("relay down".to_string())));

        let response =
            handler(store, objects(&["Person"]), mailer).handle(&event()).await.unwrap();

        assert_eq!(response.status_code, 502);
    }
}

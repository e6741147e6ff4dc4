use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    cmd::Error,
    config::AppConfig,
    engine::CoordinationPolicy,
    handlers::{AlertHandler, ArchiveHandler, ClassificationHandler},
    http_client::create_http_client,
    mail::WebhookMailer,
    notification::{Notifier, StdoutNotifier, WebhookNotifier},
    persistence::SqliteQuotaStore,
    storage::LocalObjectStore,
    vision::HttpLabelDetector,
};

/// The collaborators of one process, built from the configuration.
pub struct Services {
    /// The quota store shared by both gates.
    pub store: Arc<SqliteQuotaStore>,
    /// Both gates over `store`.
    pub policy: Arc<CoordinationPolicy<SqliteQuotaStore>>,
    /// Local object storage.
    pub objects: Arc<LocalObjectStore>,
    /// Source of `now`.
    pub clock: Arc<dyn Clock>,
    config: AppConfig,
    client: Arc<reqwest_middleware::ClientWithMiddleware>,
}

impl Services {
    /// Connects to the quota store, runs its migrations and builds the gates.
    pub async fn connect(config: AppConfig) -> Result<Self, Error> {
        tracing::debug!(database_url = %config.database_url, "Initializing quota store...");
        let store = Arc::new(SqliteQuotaStore::new(&config.database_url).await?);
        store.run_migrations().await?;

        let client = create_http_client(&config.http_retry)?;
        let notifier: Arc<dyn Notifier> = match &config.notification.webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone(), Arc::clone(&client))),
            None => Arc::new(StdoutNotifier),
        };
        tracing::debug!(topic = %config.notification.topic, webhook = config.notification.webhook_url.is_some(), "Notifier initialized.");

        let policy = Arc::new(CoordinationPolicy::new(
            Arc::clone(&store),
            config.store_keys.clone(),
            notifier,
            config.notification.topic.clone(),
        ));
        let objects = Arc::new(LocalObjectStore::new(config.object_store_root.clone()));

        Ok(Self { store, policy, objects, clock: Arc::new(SystemClock), config, client })
    }

    /// The classification handler.
    pub fn classification_handler(&self) -> ClassificationHandler<SqliteQuotaStore> {
        let classification = &self.config.classification;
        let detector = HttpLabelDetector::new(
            classification.detector_url.clone(),
            Arc::clone(&self.client),
            classification.detector_timeout,
        );
        ClassificationHandler::new(
            Arc::clone(&self.policy),
            Arc::new(detector),
            self.objects.clone(),
            Arc::clone(&self.clock),
            classification.clone(),
        )
    }

    /// The alert handler.
    pub fn alert_handler(&self) -> AlertHandler<SqliteQuotaStore> {
        let mailer =
            WebhookMailer::new(self.config.alert.email.relay_url.clone(), Arc::clone(&self.client));
        AlertHandler::new(
            Arc::clone(&self.policy),
            self.objects.clone(),
            Arc::new(mailer),
            Arc::clone(&self.clock),
            self.config.alert.clone(),
        )
    }

    /// The archive handler.
    pub fn archive_handler(&self) -> ArchiveHandler {
        ArchiveHandler::new(self.objects.clone(), Arc::clone(&self.clock), self.config.archive.clone())
    }

    /// The loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Closes the quota store.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

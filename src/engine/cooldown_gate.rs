//! Alert cooldown gate

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    clock::truncate_to_seconds,
    config::StoreKeys,
    engine::error::GateError,
    models::decision::CooldownStatus,
    persistence::traits::QuotaStore,
};

/// Allows at most one alert per cooldown period.
///
/// The gate keeps no state of its own: the period and the instant of the
/// last alert are read from the quota store on every check. There is no
/// reservation step between [`check`](Self::check) and
/// [`record_alert_sent`](Self::record_alert_sent), so two invocations racing
/// on the same window may both be permitted.
pub struct AlertCooldownGate<S: QuotaStore> {
    /// The store holding the period and the last alert timestamp.
    store: Arc<S>,

    /// Names and formats of the store entries.
    keys: StoreKeys,
}

impl<S: QuotaStore> AlertCooldownGate<S> {
    /// Creates a new AlertCooldownGate
    pub fn new(store: Arc<S>, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    /// Evaluates the cooldown at `now`. Pure read, no side effect.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn check(&self, now: NaiveDateTime) -> Result<CooldownStatus, GateError> {
        let period_secs = self.store.get_integer(&self.keys.alert_period).await?;
        if period_secs <= 0 {
            return Err(GateError::InvalidConfiguration(format!(
                "alert period must be positive, got {period_secs}"
            )));
        }

        let last_alert =
            self.store.get_timestamp(&self.keys.alert_last, &self.keys.timestamp_format).await?;

        let status = CooldownStatus::evaluate(period_secs, last_alert, now);
        tracing::debug!(
            period_secs = status.period_secs,
            last_alert = %status.last_alert,
            elapsed_secs = status.elapsed_secs,
            permitted = status.permitted(),
            "Evaluated alert cooldown."
        );
        Ok(status)
    }

    /// Overwrites the last alert timestamp with `now`.
    ///
    /// Call only once the alert has actually been delivered; recording a
    /// failed alert would suppress its retry for a whole period.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn record_alert_sent(&self, now: NaiveDateTime) -> Result<(), GateError> {
        let now = truncate_to_seconds(now);
        self.store
            .put_timestamp(&self.keys.alert_last, now, &self.keys.timestamp_format)
            .await?;
        tracing::info!(last_alert = %now, "Recorded alert dispatch.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use mockall::predicate::eq;

    use super::*;
    use crate::persistence::{error::PersistenceError, traits::MockQuotaStore};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn store_with(period: i64, last_alert: NaiveDateTime) -> MockQuotaStore {
        let keys = StoreKeys::default();
        let mut store = MockQuotaStore::new();
        store
            .expect_get_integer()
            .with(eq(keys.alert_period.clone()))
            .returning(move |_| Ok(period));
        let last_key = keys.alert_last.clone();
        store
            .expect_get_timestamp()
            .withf(move |key, _| key == last_key)
            .returning(move |_, _| Ok(last_alert));
        store
    }

    fn gate(store: MockQuotaStore) -> AlertCooldownGate<MockQuotaStore> {
        AlertCooldownGate::new(Arc::new(store), StoreKeys::default())
    }

    #[tokio::test]
    async fn test_check_denies_before_period() {
        let gate = gate(store_with(300, t0()));

        let status = gate.check(t0() + Duration::seconds(299)).await.unwrap();

        assert!(!status.permitted());
        assert_eq!(status.period_secs, 300);
        assert_eq!(status.last_alert, t0());
        assert_eq!(status.elapsed_secs, 299);
    }

    #[tokio::test]
    async fn test_check_permits_at_exact_period() {
        let gate = gate(store_with(300, t0()));

        let status = gate.check(t0() + Duration::seconds(300)).await.unwrap();

        assert!(status.permitted());
    }

    #[tokio::test]
    async fn test_non_positive_period_is_invalid() {
        let gate = gate(store_with(0, t0()));

        let result = gate.check(t0()).await;

        assert!(matches!(result, Err(GateError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_missing_last_alert_is_propagated() {
        let mut store = MockQuotaStore::new();
        store.expect_get_integer().returning(|_| Ok(300));
        store
            .expect_get_timestamp()
            .returning(|key, _| Err(PersistenceError::NotFound(key.to_string())));

        let result = gate(store).check(t0()).await;

        assert!(matches!(result, Err(GateError::Store(PersistenceError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_unavailable_store_is_propagated() {
        let mut store = MockQuotaStore::new();
        store
            .expect_get_integer()
            .returning(|_| Err(PersistenceError::Unavailable("timeout".to_string())));

        let result = gate(store).check(t0()).await;

        assert!(matches!(result, Err(GateError::Store(PersistenceError::Unavailable(_)))));
    }

    #[tokio::test]
    async fn test_record_alert_sent_overwrites_last_alert() {
        let keys = StoreKeys::default();
        let mut store = MockQuotaStore::new();
        let last_key = keys.alert_last.clone();
        let format = keys.timestamp_format.clone();
        store
            .expect_put_timestamp()
            .withf(move |key, value, fmt| key == last_key && *value == t0() && fmt == format)
            .times(1)
            .returning(|_, _, _| Ok(()));

        gate(store).record_alert_sent(t0()).await.unwrap();
    }
}

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    config::StoreKeys,
    persistence::{SqliteQuotaStore, error::PersistenceError, traits::QuotaStore},
};

/// An in-memory SQLite quota store with migrations applied.
pub async fn setup_store() -> Arc<SqliteQuotaStore> {
    let store = SqliteQuotaStore::new("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    store.run_migrations().await.expect("Failed to run migrations");
    Arc::new(store)
}

/// Writes the gate parameters and the last alert instant.
pub async fn seed_store(
    store: &SqliteQuotaStore,
    keys: &StoreKeys,
    period_secs: i64,
    max_50: i64,
    max_100: i64,
    last_alert: NaiveDateTime,
) -> Result<(), PersistenceError> {
    store.put_integer(&keys.alert_period, period_secs).await?;
    store.put_integer(&keys.calls_month_max_50, max_50).await?;
    store.put_integer(&keys.calls_month_max_100, max_100).await?;
    store.put_flag(&keys.disable_until_alert_period, false).await?;
    store.put_timestamp(&keys.alert_last, last_alert, &keys.timestamp_format).await
}

use chrono::{NaiveDateTime, TimeDelta};

use crate::{
    clock::truncate_to_seconds,
    cmd::Error,
    config::{SeedConfig, StoreKeys},
    persistence::{error::PersistenceError, traits::QuotaStore},
};

/// Writes the operator parameters into the quota store.
///
/// Period, thresholds and flag are overwritten. The last alert timestamp is
/// only initialized when missing, one period before `now` so that the first
/// alert is not held back. A period that cannot be subtracted from `now` is
/// rejected before anything is written.
#[tracing::instrument(skip(store, keys), level = "info")]
pub async fn execute<S: QuotaStore + ?Sized>(
    store: &S,
    keys: &StoreKeys,
    seed: &SeedConfig,
    now: NaiveDateTime,
) -> Result<(), Error> {
    let initial = TimeDelta::try_seconds(seed.alert_period_secs)
        .and_then(|period| now.checked_sub_signed(period))
        .map(truncate_to_seconds)
        .ok_or_else(|| {
            Error::InvalidSeed(format!(
                "alert period of {} s cannot be subtracted from {now}",
                seed.alert_period_secs
            ))
        })?;

    store.put_integer(&keys.alert_period, seed.alert_period_secs).await?;
    store.put_integer(&keys.calls_month_max_50, seed.calls_month_max_50).await?;
    store.put_integer(&keys.calls_month_max_100, seed.calls_month_max_100).await?;
    store.put_flag(&keys.disable_until_alert_period, seed.disable_until_alert_period).await?;

    match store.get_timestamp(&keys.alert_last, &keys.timestamp_format).await {
        Ok(last_alert) => {
            tracing::info!(%last_alert, "Keeping existing last alert timestamp.");
        }
        Err(PersistenceError::NotFound(_)) => {
            store.put_timestamp(&keys.alert_last, initial, &keys.timestamp_format).await?;
            tracing::info!(last_alert = %initial, "Initialized last alert timestamp.");
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Quota store seeded.");
    Ok(())
}

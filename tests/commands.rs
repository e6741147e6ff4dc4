//! Integration tests for the seed and status commands

use std::sync::Arc;

use camwatch::{
    cmd::{self, seed, status},
    config::{SeedConfig, StoreKeys},
    engine::CoordinationPolicy,
    persistence::{error::PersistenceError, traits::QuotaStore},
    test_helpers::{RecordingNotifier, setup_store},
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap()
}

#[tokio::test]
async fn test_seed_then_status() {
    let keys = StoreKeys::default();
    let store = setup_store().await;
    let seed_config = SeedConfig {
        alert_period_secs: 600,
        calls_month_max_50: 10,
        calls_month_max_100: 20,
        disable_until_alert_period: true,
    };

    seed::execute(store.as_ref(), &keys, &seed_config, now()).await.unwrap();

    assert_eq!(store.get_integer(&keys.alert_period).await.unwrap(), 600);
    assert!(store.get_flag(&keys.disable_until_alert_period).await.unwrap());
    assert_eq!(
        store.get_timestamp(&keys.alert_last, &keys.timestamp_format).await.unwrap(),
        now() - Duration::seconds(600)
    );

    let notifier = Arc::new(RecordingNotifier::new());
    let policy = CoordinationPolicy::new(Arc::clone(&store), keys, notifier.clone(), "budget");
    let report = status::execute(&policy, now()).await.unwrap();

    assert!(report.alert_permitted);
    assert!(report.budget.permitted());
    assert_eq!(report.budget.current_count, Some(0));
    assert_eq!(report.budget.max_100, Some(20));
    assert!(notifier.publications().is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["cooldown"]["period_secs"], 600);
}

#[tokio::test]
async fn test_reseeding_keeps_last_alert() {
    let keys = StoreKeys::default();
    let store = setup_store().await;
    let seed_config = SeedConfig::default();

    seed::execute(store.as_ref(), &keys, &seed_config, now()).await.unwrap();
    let later = now() + Duration::days(3);
    seed::execute(store.as_ref(), &keys, &seed_config, later).await.unwrap();

    assert_eq!(
        store.get_timestamp(&keys.alert_last, &keys.timestamp_format).await.unwrap(),
        now() - Duration::seconds(seed_config.alert_period_secs)
    );
}

#[tokio::test]
async fn test_unrepresentable_period_is_rejected_before_writing() {
    let keys = StoreKeys::default();
    let store = setup_store().await;

    for period in [i64::MAX, 1_000_000_000_000_000] {
        let seed_config = SeedConfig { alert_period_secs: period, ..SeedConfig::default() };

        let result = seed::execute(store.as_ref(), &keys, &seed_config, now()).await;

        assert!(matches!(result, Err(cmd::Error::InvalidSeed(_))), "period {period}");
        assert!(matches!(
            store.get_integer(&keys.alert_period).await,
            Err(PersistenceError::NotFound(_))
        ));
    }
}

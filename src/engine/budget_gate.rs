//! Monthly API call budget gate

use std::{fmt::Write, sync::Arc};

use chrono::NaiveDateTime;

use crate::{
    config::StoreKeys,
    engine::{cooldown_gate::AlertCooldownGate, error::GateError},
    models::decision::{BudgetBand, BudgetDecision, DenyCause, Threshold, Verdict},
    notification::Notifier,
    persistence::{error::PersistenceError, traits::QuotaStore},
};

/// Counter and thresholds read for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BudgetSnapshot {
    current_count: i64,
    next_count: i64,
    max_50: i64,
    max_100: i64,
}

/// Gates calls to the metered classification service on a monthly budget.
///
/// Each month has its own counter, keyed by the store prefix and the
/// `(year, month)` of the evaluation instant. The counter is created at zero
/// on first use through the store's conditional create, and incremented by
/// the caller after every successful metered call.
///
/// Crossing the 50% or 100% threshold publishes a notification. The gate
/// claims a per-month marker key with a conditional create before
/// publishing, so a crossing is announced once even when several invocations
/// observe it or a check is repeated without an increment.
pub struct ApiCallBudgetGate<S: QuotaStore> {
    /// The store holding counters, thresholds and the disable flag.
    store: Arc<S>,

    /// Names and formats of the store entries.
    keys: StoreKeys,

    /// Consulted first when the disable flag is set.
    cooldown: AlertCooldownGate<S>,

    /// Publishes threshold crossings.
    notifier: Arc<dyn Notifier>,

    /// The topic threshold crossings are published on.
    topic: String,
}

impl<S: QuotaStore> ApiCallBudgetGate<S> {
    /// Creates a new ApiCallBudgetGate
    pub fn new(
        store: Arc<S>,
        keys: StoreKeys,
        notifier: Arc<dyn Notifier>,
        topic: impl Into<String>,
    ) -> Self {
        let cooldown = AlertCooldownGate::new(Arc::clone(&store), keys.clone());
        Self { store, keys, cooldown, notifier, topic: topic.into() }
    }

    /// The counter key of the month containing `now`, e.g.
    /// `rekognition_api_calls_2024_06`.
    pub fn month_counter_key(&self, now: NaiveDateTime) -> Result<String, GateError> {
        let mut key = self.keys.calls_month_prefix.clone();
        write!(key, "{}", now.format(&self.keys.month_suffix_format)).map_err(|_| {
            GateError::InvalidConfiguration(format!(
                "invalid month suffix format: {}",
                self.keys.month_suffix_format
            ))
        })?;
        Ok(key)
    }

    /// The marker key claimed when `threshold` is crossed in the month
    /// containing `now`.
    pub fn crossing_marker_key(
        &self,
        now: NaiveDateTime,
        threshold: Threshold,
    ) -> Result<String, GateError> {
        Ok(format!("{}_notified_{}", self.month_counter_key(now)?, threshold.percent()))
    }

    /// Decides whether one more metered call is permitted at `now`, and
    /// publishes a notification when that call reaches a threshold.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn check_and_notify(&self, now: NaiveDateTime) -> Result<BudgetDecision, GateError> {
        let disabled = self.store.get_flag(&self.keys.disable_until_alert_period).await?;
        tracing::info!(disable_until_alert_period = disabled, "Read budget gate flag.");

        if disabled {
            let status = self.cooldown.check(now).await?;
            if !status.permitted() {
                let cause = DenyCause::CooldownActive(status);
                tracing::info!(%cause, "Metered call denied.");
                return Ok(BudgetDecision {
                    verdict: Verdict::Denied(cause),
                    band: None,
                    current_count: None,
                    max_100: None,
                });
            }
            tracing::info!(cooldown = %status, "Checking call thresholds after alert period.");
        }

        let snapshot = self.snapshot(now).await?;
        let band = BudgetBand::classify(snapshot.next_count, snapshot.max_50, snapshot.max_100);

        match band {
            BudgetBand::BelowHalf => {}
            BudgetBand::HalfReached => {
                tracing::info!(max_50 = snapshot.max_50, "Call threshold 50% reached just now.");
            }
            BudgetBand::AboveHalf => {
                tracing::info!(max_50 = snapshot.max_50, "Call threshold 50% exceeded.");
            }
            BudgetBand::FullReached => {
                tracing::info!(max_100 = snapshot.max_100, "Call threshold 100% reached just now.");
            }
            BudgetBand::Exceeded => {
                tracing::info!(max_100 = snapshot.max_100, "Call threshold 100% exceeded.");
            }
        }

        if let Some(threshold) = band.crossing() {
            let limit = match threshold {
                Threshold::Half => snapshot.max_50,
                Threshold::Full => snapshot.max_100,
            };
            self.announce_crossing(now, threshold, limit).await?;
        }

        Ok(Self::decision(band, snapshot))
    }

    /// Evaluates the budget at `now` without consulting the disable flag and
    /// without publishing anything.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn peek(&self, now: NaiveDateTime) -> Result<BudgetDecision, GateError> {
        let snapshot = self.snapshot(now).await?;
        let band = BudgetBand::classify(snapshot.next_count, snapshot.max_50, snapshot.max_100);
        Ok(Self::decision(band, snapshot))
    }

    /// Records one performed metered call in the month containing `now`.
    ///
    /// `observed_count` is the count the caller's check saw; when absent the
    /// counter is read first. The write is a plain overwrite with
    /// `count + 1`; concurrent increments may lose updates. Returns the
    /// written value.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn increment(
        &self,
        now: NaiveDateTime,
        observed_count: Option<i64>,
    ) -> Result<i64, GateError> {
        let key = self.month_counter_key(now)?;
        let current = match observed_count {
            Some(count) => count,
            None => self.current_count(&key).await?,
        };
        let next = next_count(&key, current)?;
        self.store.put_integer(&key, next).await?;
        tracing::info!(key, calls = next, "Incremented monthly call counter.");
        Ok(next)
    }

    /// Reads the counter under `key`, creating it at zero on first use.
    async fn current_count(&self, key: &str) -> Result<i64, GateError> {
        if self.store.create_integer_if_absent(key, 0).await? {
            tracing::info!(key, "Initialized monthly call counter.");
        }
        Ok(self.store.get_integer(key).await?)
    }

    async fn snapshot(&self, now: NaiveDateTime) -> Result<BudgetSnapshot, GateError> {
        let key = self.month_counter_key(now)?;
        let current_count = self.current_count(&key).await?;
        let max_50 = self.store.get_integer(&self.keys.calls_month_max_50).await?;
        let max_100 = self.store.get_integer(&self.keys.calls_month_max_100).await?;

        if !(0 < max_50 && max_50 < max_100) {
            return Err(GateError::InvalidConfiguration(format!(
                "call thresholds must satisfy 0 < max_50 < max_100, got {max_50} and {max_100}"
            )));
        }

        let next = next_count(&key, current_count)?;
        tracing::info!(key, current_count, max_50, max_100, "Read monthly call budget.");
        Ok(BudgetSnapshot { current_count, next_count: next, max_50, max_100 })
    }

    fn decision(band: BudgetBand, snapshot: BudgetSnapshot) -> BudgetDecision {
        let verdict = if band.permits() {
            Verdict::Permitted
        } else {
            Verdict::Denied(DenyCause::BudgetExceeded { max_100: snapshot.max_100 })
        };
        BudgetDecision {
            verdict,
            band: Some(band),
            current_count: Some(snapshot.current_count),
            max_100: Some(snapshot.max_100),
        }
    }

    /// Publishes the crossing of `threshold` unless another evaluation
    /// already claimed it this month. Publication failures are logged only.
    async fn announce_crossing(
        &self,
        now: NaiveDateTime,
        threshold: Threshold,
        limit: i64,
    ) -> Result<(), GateError> {
        let marker = self.crossing_marker_key(now, threshold)?;
        if !self.store.create_integer_if_absent(&marker, limit).await? {
            tracing::debug!(marker, "Threshold crossing already announced.");
            return Ok(());
        }

        let percent = threshold.percent();
        let subject = format!("API calls threshold {percent}%");
        let mut body =
            format!("The API calls threshold {percent}% ({limit} calls) has been reached.");
        if threshold == Threshold::Full {
            body.push_str(
                "\n\nNO MORE API CALLS WILL BE ALLOWED DURING THE CURRENT BILLING PERIOD",
            );
        }

        match self.notifier.publish(&self.topic, &subject, &body).await {
            Ok(()) => tracing::info!(topic = %self.topic, percent, "Published threshold crossing."),
            Err(e) => tracing::warn!(
                topic = %self.topic,
                percent,
                error = %e,
                "Failed to publish threshold crossing."
            ),
        }
        Ok(())
    }
}

/// The counter value after one more call, refusing to wrap.
fn next_count(key: &str, count: i64) -> Result<i64, GateError> {
    count.checked_add(1).ok_or_else(|| {
        GateError::Store(PersistenceError::InvalidValue {
            key: key.to_string(),
            reason: format!("call counter {count} cannot be incremented"),
        })
    })
}

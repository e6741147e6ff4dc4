//! Composition of the cooldown and budget gates.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    config::StoreKeys,
    engine::{budget_gate::ApiCallBudgetGate, cooldown_gate::AlertCooldownGate, error::GateError},
    models::decision::{BudgetDecision, CooldownStatus},
    notification::Notifier,
    persistence::traits::QuotaStore,
};

/// The gating surface offered to the event handlers.
///
/// "May I call the classifier now?" is answered by the budget gate, "may I
/// send an alert now, and remember that I did" by the cooldown gate. When the
/// disable flag is set the budget gate consults the cooldown gate first.
pub struct CoordinationPolicy<S: QuotaStore> {
    cooldown: AlertCooldownGate<S>,
    budget: ApiCallBudgetGate<S>,
}

impl<S: QuotaStore> CoordinationPolicy<S> {
    /// Creates a new CoordinationPolicy sharing one store between both gates.
    pub fn new(
        store: Arc<S>,
        keys: StoreKeys,
        notifier: Arc<dyn Notifier>,
        topic: impl Into<String>,
    ) -> Self {
        let cooldown = AlertCooldownGate::new(Arc::clone(&store), keys.clone());
        let budget = ApiCallBudgetGate::new(store, keys, notifier, topic);
        Self { cooldown, budget }
    }

    /// Whether an alert may be sent at `now`.
    pub async fn cooldown_check(&self, now: NaiveDateTime) -> Result<CooldownStatus, GateError> {
        self.cooldown.check(now).await
    }

    /// Remembers that an alert was delivered at `now`.
    pub async fn record_alert_sent(&self, now: NaiveDateTime) -> Result<(), GateError> {
        self.cooldown.record_alert_sent(now).await
    }

    /// Whether one more metered call may be made at `now`. Publishes a
    /// threshold crossing when this call reaches one.
    pub async fn budget_check(&self, now: NaiveDateTime) -> Result<BudgetDecision, GateError> {
        self.budget.check_and_notify(now).await
    }

    /// Records a performed metered call. Returns the new counter value.
    pub async fn budget_increment(
        &self,
        now: NaiveDateTime,
        observed_count: Option<i64>,
    ) -> Result<i64, GateError> {
        self.budget.increment(now, observed_count).await
    }

    /// The current budget state at `now`, without side effects.
    pub async fn budget_status(&self, now: NaiveDateTime) -> Result<BudgetDecision, GateError> {
        self.budget.peek(now).await
    }
}

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    cmd::Error,
    engine::CoordinationPolicy,
    models::{BudgetDecision, CooldownStatus},
    persistence::traits::QuotaStore,
};

/// Current state of both gates.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// The alert cooldown.
    pub cooldown: CooldownStatus,
    /// Whether an alert would be permitted now.
    pub alert_permitted: bool,
    /// The monthly budget, evaluated for one more call.
    pub budget: BudgetDecision,
}

/// Reads both gates at `now` without notifying. A missing month counter is
/// created at zero.
pub async fn execute<S: QuotaStore>(
    policy: &CoordinationPolicy<S>,
    now: NaiveDateTime,
) -> Result<StatusReport, Error> {
    let cooldown = policy.cooldown_check(now).await?;
    let budget = policy.budget_status(now).await?;
    Ok(StatusReport { alert_permitted: cooldown.permitted(), cooldown, budget })
}

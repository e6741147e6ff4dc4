//! Typed outcomes of the cooldown and budget gates.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Result of evaluating the alert cooldown against the stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooldownStatus {
    /// The configured minimum number of seconds between two alerts.
    pub period_secs: i64,
    /// When the last alert was recorded.
    pub last_alert: NaiveDateTime,
    /// Whole seconds elapsed between `last_alert` and the evaluation instant.
    pub elapsed_secs: i64,
}

impl CooldownStatus {
    /// Builds the status for an evaluation at `now`.
    pub fn evaluate(period_secs: i64, last_alert: NaiveDateTime, now: NaiveDateTime) -> Self {
        let elapsed_secs = (now - last_alert).num_seconds();
        Self { period_secs, last_alert, elapsed_secs }
    }

    /// An alert is permitted once the full period has elapsed.
    pub fn permitted(&self) -> bool {
        self.elapsed_secs >= self.period_secs
    }
}

impl fmt::Display for CooldownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alert period ({} s), last alert was on '{}' ({} s ago)",
            self.period_secs, self.last_alert, self.elapsed_secs
        )
    }
}

/// One of the two monthly budget thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// The 50% warning threshold.
    Half,
    /// The 100% threshold, the last permitted call of the month.
    Full,
}

impl Threshold {
    /// Percentage shown in notifications.
    pub fn percent(&self) -> u8 {
        match self {
            Threshold::Half => 50,
            Threshold::Full => 100,
        }
    }
}

/// Where the next metered call falls relative to the monthly thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBand {
    /// `next < max_50`
    BelowHalf,
    /// `next == max_50`
    HalfReached,
    /// `max_50 < next < max_100`
    AboveHalf,
    /// `next == max_100`
    FullReached,
    /// `next > max_100`
    Exceeded,
}

impl BudgetBand {
    /// Classifies `next`, the count the month would reach with one more call.
    /// Assumes `max_50 < max_100`.
    pub fn classify(next: i64, max_50: i64, max_100: i64) -> Self {
        if next < max_50 {
            BudgetBand::BelowHalf
        } else if next == max_50 {
            BudgetBand::HalfReached
        } else if next < max_100 {
            BudgetBand::AboveHalf
        } else if next == max_100 {
            BudgetBand::FullReached
        } else {
            BudgetBand::Exceeded
        }
    }

    /// Whether a call in this band may go through.
    pub fn permits(&self) -> bool {
        !matches!(self, BudgetBand::Exceeded)
    }

    /// The threshold crossed by a call in this band, if any.
    pub fn crossing(&self) -> Option<Threshold> {
        match self {
            BudgetBand::HalfReached => Some(Threshold::Half),
            BudgetBand::FullReached => Some(Threshold::Full),
            _ => None,
        }
    }
}

/// Why a gate denied the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenyCause {
    /// The disable flag is set and the alert cooldown is still running.
    CooldownActive(CooldownStatus),
    /// The month already used its whole call budget.
    BudgetExceeded {
        /// The 100% threshold that was exceeded.
        max_100: i64,
    },
}

impl fmt::Display for DenyCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyCause::CooldownActive(status) => {
                write!(f, "suppressed pending alert cooldown: {status}")
            }
            DenyCause::BudgetExceeded { max_100 } => {
                write!(f, "monthly call budget exceeded ({max_100} calls)")
            }
        }
    }
}

/// Permit or deny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The gated action may proceed.
    Permitted,
    /// The gated action must not proceed.
    Denied(DenyCause),
}

/// Outcome of the budget gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetDecision {
    /// Whether the metered call may go through.
    pub verdict: Verdict,
    /// The band of `current_count + 1`; `None` when thresholds were not
    /// evaluated.
    pub band: Option<BudgetBand>,
    /// Calls already made this month; `None` when the counter was not read.
    pub current_count: Option<i64>,
    /// The 100% threshold; `None` when thresholds were not read.
    pub max_100: Option<i64>,
}

impl BudgetDecision {
    /// Whether the verdict is [`Verdict::Permitted`].
    pub fn permitted(&self) -> bool {
        matches!(self.verdict, Verdict::Permitted)
    }

    /// Human readable reason for a denial.
    pub fn cause(&self) -> Option<String> {
        match &self.verdict {
            Verdict::Permitted => None,
            Verdict::Denied(cause) => Some(cause.to_string()),
        }
    }
}

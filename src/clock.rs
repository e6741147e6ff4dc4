//! Clock abstraction for the handlers.
//!
//! The gates never read the time themselves; handlers take `now` from a
//! [`Clock`] once per invocation and pass it down, so a whole invocation
//! agrees on a single instant.

use chrono::{Local, NaiveDateTime, Timelike, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Local wall-clock time, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;

    /// UTC wall-clock time, used for timestamps written into output records.
    fn now_utc(&self) -> NaiveDateTime;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_seconds(Local::now().naive_local())
    }

    fn now_utc(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Drops sub-second precision; stored timestamps have second resolution.
pub fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

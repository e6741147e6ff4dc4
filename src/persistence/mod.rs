//! This module contains the quota state persistence for camwatch.

pub mod error;
pub mod sqlite;
pub use sqlite::SqliteQuotaStore;
pub mod traits;

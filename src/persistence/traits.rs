//! The storage contract shared by the alert and budget gates.

use async_trait::async_trait;
use chrono::NaiveDateTime;
#[cfg(test)]
use mockall::automock;

use crate::persistence::error::PersistenceError;

/// A flat key/value namespace of scalar counters, timestamps and flags.
///
/// Every read goes to the backing store; implementations must not cache
/// values between calls. Reads of absent keys fail with
/// [`PersistenceError::NotFound`], backend failures with
/// [`PersistenceError::Unavailable`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Reads an integer value.
    async fn get_integer(&self, key: &str) -> Result<i64, PersistenceError>;

    /// Reads a timestamp stored as text in the given `chrono` format.
    async fn get_timestamp(
        &self,
        key: &str,
        format: &str,
    ) -> Result<NaiveDateTime, PersistenceError>;

    /// Reads a boolean flag.
    async fn get_flag(&self, key: &str) -> Result<bool, PersistenceError>;

    /// Writes an integer value, replacing any previous value.
    async fn put_integer(&self, key: &str, value: i64) -> Result<(), PersistenceError>;

    /// Writes a timestamp as text in the given `chrono` format, replacing any
    /// previous value.
    async fn put_timestamp(
        &self,
        key: &str,
        value: NaiveDateTime,
        format: &str,
    ) -> Result<(), PersistenceError>;

    /// Writes a boolean flag, replacing any previous value.
    async fn put_flag(&self, key: &str, value: bool) -> Result<(), PersistenceError>;

    /// Atomically creates an integer key if it does not exist yet.
    ///
    /// Returns `true` when this call created the key and `false` when the key
    /// was already present. An existing value is never overwritten, and
    /// losing a concurrent creation race is reported as `Ok(false)`.
    async fn create_integer_if_absent(
        &self,
        key: &str,
        initial_value: i64,
    ) -> Result<bool, PersistenceError>;
}

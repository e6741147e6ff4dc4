//! Implementation of the QuotaStore trait for SqliteQuotaStore

use std::fmt::Write;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::persistence::{
    error::PersistenceError, sqlite::SqliteQuotaStore, traits::QuotaStore,
};

#[async_trait]
impl QuotaStore for SqliteQuotaStore {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_integer(&self, key: &str) -> Result<i64, PersistenceError> {
        let raw = self.get_raw(key).await?;
        raw.trim().parse::<i64>().map_err(|e| PersistenceError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_timestamp(
        &self,
        key: &str,
        format: &str,
    ) -> Result<NaiveDateTime, PersistenceError> {
        let raw = self.get_raw(key).await?;
        NaiveDateTime::parse_from_str(raw.trim(), format).map_err(|e| {
            PersistenceError::InvalidValue { key: key.to_string(), reason: e.to_string() }
        })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_flag(&self, key: &str) -> Result<bool, PersistenceError> {
        let raw = self.get_raw(key).await?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(PersistenceError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{other}' is not a boolean"),
            }),
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn put_integer(&self, key: &str, value: i64) -> Result<(), PersistenceError> {
        tracing::debug!(key, value, "Writing integer value.");
        self.put_raw(key, &value.to_string()).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn put_timestamp(
        &self,
        key: &str,
        value: NaiveDateTime,
        format: &str,
    ) -> Result<(), PersistenceError> {
        let mut text = String::new();
        write!(text, "{}", value.format(format)).map_err(|_| {
            PersistenceError::InvalidInput(format!("Invalid timestamp format: {format}"))
        })?;
        tracing::debug!(key, value = %text, "Writing timestamp value.");
        self.put_raw(key, &text).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn put_flag(&self, key: &str, value: bool) -> Result<(), PersistenceError> {
        tracing::debug!(key, value, "Writing flag value.");
        self.put_raw(key, if value { "true" } else { "false" }).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn create_integer_if_absent(
        &self,
        key: &str,
        initial_value: i64,
    ) -> Result<bool, PersistenceError> {
        let result = self
            .execute_query_with_error_handling(
                "create integer if absent",
                sqlx::query(
                    "INSERT INTO quota_state (key, value) VALUES (?, ?) \
                     ON CONFLICT(key) DO NOTHING",
                )
                .bind(key)
                .bind(initial_value.to_string())
                .execute(&self.pool),
            )
            .await?;

        let created = result.rows_affected() == 1;
        if created {
            tracing::info!(key, initial_value, "Created key.");
        } else {
            tracing::debug!(key, "Key already exists, conditional write skipped.");
        }
        Ok(created)
    }
}

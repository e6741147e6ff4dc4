//! This module provides a concrete implementation of the QuotaStore using
//! SQLite.

use std::str::FromStr;

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub mod quota_store;

use crate::persistence::error::PersistenceError;

/// A concrete implementation of the QuotaStore using SQLite.
pub struct SqliteQuotaStore {
    /// The SQLite connection pool used for database operations.
    pool: SqlitePool,
}

impl SqliteQuotaStore {
    /// Creates a new instance of SqliteQuotaStore with the provided database
    /// URL. This will create the database file if it does not exist.
    #[tracing::instrument(level = "info")]
    pub async fn new(database_url: &str) -> Result<Self, PersistenceError> {
        tracing::debug!(database_url, "Attempting to connect to SQLite database.");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| PersistenceError::InvalidInput(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            PersistenceError::Unavailable(format!("Failed to connect to database: {}", e))
        })?;
        tracing::info!(database_url, "Successfully connected to SQLite database.");
        Ok(Self { pool })
    }

    /// Runs database migrations.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn run_migrations(&self) -> Result<(), PersistenceError> {
        tracing::debug!("Running database migrations.");
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run database migrations.");
            PersistenceError::MigrationError(e.to_string())
        })?;
        tracing::info!("Database migrations completed successfully.");
        Ok(())
    }

    /// Closes the connection pool gracefully.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn close(&self) {
        tracing::debug!("Closing SQLite connection pool.");
        self.pool.close().await;
        tracing::info!("SQLite connection pool closed successfully.");
    }

    /// Helper to execute database queries with consistent error handling
    async fn execute_query_with_error_handling<F, T, E>(
        &self,
        operation: &str,
        query_fn: F,
    ) -> Result<T, PersistenceError>
    where
        F: std::future::Future<Output = Result<T, E>>,
        E: std::error::Error,
    {
        query_fn.await.map_err(|e| {
            tracing::error!(error = %e, operation = %operation, "Database operation failed.");
            PersistenceError::Unavailable(e.to_string())
        })
    }

    /// Fetches the raw text stored under `key`.
    async fn get_raw(&self, key: &str) -> Result<String, PersistenceError> {
        let value = self
            .execute_query_with_error_handling(
                "get raw value",
                sqlx::query_scalar::<_, String>("SELECT value FROM quota_state WHERE key = ?")
                    .bind(key)
                    .fetch_optional(&self.pool),
            )
            .await?;

        value.ok_or_else(|| PersistenceError::NotFound(key.to_string()))
    }

    /// Inserts or replaces the raw text stored under `key`.
    async fn put_raw(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.execute_query_with_error_handling(
            "put raw value",
            sqlx::query(
                "INSERT INTO quota_state (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            )
            .bind(key)
            .bind(value)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

//! This module contains the error types for the persistence layer.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The requested key does not exist in the store.
    #[error("The requested key was not found: {0}")]
    NotFound(String),

    /// The backing store could not be reached or rejected the operation.
    #[error("The quota store is unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded into the requested type.
    #[error("Invalid value stored under '{key}': {reason}")]
    InvalidValue {
        /// The key holding the malformed value.
        key: String,
        /// Why the value could not be decoded.
        reason: String,
    },

    /// An error occurred during a database migration.
    #[error("A data migration failed: {0}")]
    MigrationError(String),

    /// An invalid configuration or input was provided.
    #[error("An invalid configuration or input was provided: {0}")]
    InvalidInput(String),
}

//! This module contains the error types for object storage.

use thiserror::Error;

/// Errors that can occur while reading or writing objects.
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// The bucket does not exist.
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// The object does not exist.
    #[error("Object not found: {bucket}/{key}")]
    NotFound {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
    },

    /// A bucket name or key cannot be mapped to a storage location.
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    /// The backend failed.
    #[error("Object storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

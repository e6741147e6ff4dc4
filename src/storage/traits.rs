//! The object storage contract used by the handlers and the archiver.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::storage::error::ObjectStoreError;

/// Buckets of opaque objects addressed by `/`-separated keys.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Keys in `bucket` starting with `prefix`, sorted.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;

    /// Reads a whole object.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Writes a whole object, replacing any previous content.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ObjectStoreError>;

    /// Deletes an object. Deleting a missing object succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;
}

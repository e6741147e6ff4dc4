//! Object storage on the local filesystem.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;

use crate::storage::{error::ObjectStoreError, traits::ObjectStore};

/// Stores every bucket as a sub-directory of `root` and every object as a
/// file below it, the key's `/` separators becoming directories.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Creates a new LocalObjectStore rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, ObjectStoreError> {
        if bucket.is_empty() || !is_plain_relative(Path::new(bucket)) || bucket.contains('/') {
            return Err(ObjectStoreError::InvalidKey(bucket.to_string()));
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, ObjectStoreError> {
        if key.is_empty() || key.ends_with('/') || !is_plain_relative(Path::new(key)) {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.bucket_path(bucket)?.join(key))
    }
}

/// Only normal components: no root, no `..`, no `.`.
fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        let bucket_dir = self.bucket_path(bucket)?;
        if !fs::try_exists(&bucket_dir).await? {
            return Err(ObjectStoreError::BucketNotFound(bucket.to_string()));
        }

        let mut keys = Vec::new();
        let mut pending = vec![(bucket_dir, String::new())];
        while let Some((dir, dir_key)) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 object name.");
                    continue;
                };
                let key = format!("{dir_key}{name}");
                if entry.file_type().await?.is_dir() {
                    pending.push((entry.path(), format!("{key}/")));
                } else if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        tracing::debug!(bucket, prefix, count = keys.len(), "Listed objects.");
        Ok(keys)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                ObjectStoreError::NotFound { bucket: bucket.to_string(), key: key.to_string() }
            }
            _ => ObjectStoreError::Io(e),
        })
    }

    #[tracing::instrument(skip(self, body), fields(size = body.len()), level = "debug")]
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ObjectStoreError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, body).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        let path = self.object_path(bucket, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

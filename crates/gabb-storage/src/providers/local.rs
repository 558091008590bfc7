//! Local filesystem object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use gabb_core::error::{AppError, ErrorKind};
use gabb_core::result::AppResult;
use gabb_core::traits::ObjectStore;

/// Object store that maps `bucket/key` onto `{root}/{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a store rooted at the given path, creating it if missing.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve `bucket/key` to a path under the root.
    ///
    /// Only plain path segments are accepted so a key can never escape the
    /// bucket directory.
    fn resolve(&self, bucket: &str, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(bucket).join(key.trim_start_matches('/'));
        if bucket.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::validation(format!(
                "Invalid object location: {bucket}/{key}"
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Write an object, creating the bucket directory as needed.
    pub async fn put(&self, bucket: &str, key: &str, data: Bytes) -> AppResult<()> {
        let path = self.resolve(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create bucket directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {bucket}/{key}"),
                e,
            )
        })?;
        debug!(bucket, key, bytes = data.len(), "Wrote object");
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self, bucket: &str) -> AppResult<bool> {
        let dir = self.root.join(bucket);
        Ok(fs::metadata(&dir).await.map(|m| m.is_dir()).unwrap_or(false))
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        let path = self.resolve(bucket, key)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {bucket}/{key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object: {bucket}/{key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }
}

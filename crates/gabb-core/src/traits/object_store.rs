//! Object storage trait for pluggable blob backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Read access to a bucket/key object store.
///
/// Implementations exist for S3 and the local filesystem. The trait is
/// defined here in `gabb-core` and implemented in `gabb-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider can reach the given bucket.
    async fn health_check(&self, bucket: &str) -> AppResult<bool>;

    /// Fetch a whole object into memory.
    ///
    /// A missing object is a `NotFound` error; an unreachable backend is a
    /// `Storage` error.
    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes>;
}

//! TTL cache over another key provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey};
use moka::future::Cache;

use super::KeyProvider;
use crate::error::AuthError;

/// Keeps parsed keys in memory for a fixed time.
///
/// Failed loads are not cached.
#[derive(Clone)]
pub struct CachedKeyProvider {
    inner: Arc<dyn KeyProvider>,
    private: Cache<(), EncodingKey>,
    public: Cache<(), DecodingKey>,
}

impl std::fmt::Debug for CachedKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedKeyProvider")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl CachedKeyProvider {
    /// Wrap `inner`, caching each key for `ttl`.
    pub fn new(inner: Arc<dyn KeyProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            private: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            public: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Drop cached keys so the next call reloads them.
    pub fn invalidate(&self) {
        self.private.invalidate_all();
        self.public.invalidate_all();
    }
}

#[async_trait]
impl KeyProvider for CachedKeyProvider {
    async fn private_key(&self) -> Result<EncodingKey, AuthError> {
        self.private
            .try_get_with((), self.inner.private_key())
            .await
            .map_err(|e| (*e).clone())
    }

    async fn public_key(&self) -> Result<DecodingKey, AuthError> {
        self.public
            .try_get_with((), self.inner.public_key())
            .await
            .map_err(|e| (*e).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::ObjectStoreKeyProvider;
    use crate::testing::{self, MemoryObjectStore};
    use gabb_core::config::AuthConfig;

    fn make_provider() -> (Arc<MemoryObjectStore>, CachedKeyProvider) {
        let store = Arc::new(testing::key_bucket());
        let inner = ObjectStoreKeyProvider::new(&AuthConfig::default(), store.clone());
        let cached = CachedKeyProvider::new(Arc::new(inner), Duration::from_secs(300));
        (store, cached)
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let (store, provider) = make_provider();
        provider.public_key().await.unwrap();
        provider.public_key().await.unwrap();
        provider.private_key().await.unwrap();
        provider.private_key().await.unwrap();
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let (store, provider) = make_provider();
        store.set_unavailable(true);
        assert!(provider.public_key().await.is_err());

        store.set_unavailable(false);
        assert!(provider.public_key().await.is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let (store, provider) = make_provider();
        provider.public_key().await.unwrap();
        provider.invalidate();
        provider.public_key().await.unwrap();
        assert_eq!(store.fetch_count(), 2);
    }
}

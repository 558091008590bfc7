//! Key pair fetched from object storage.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey};
use tracing::warn;

use gabb_core::config::AuthConfig;
use gabb_core::traits::ObjectStore;

use super::{KeyProvider, parse_private_pem, parse_public_pem};
use crate::error::AuthError;

/// Reads `private.pem` / `public.pem` (names configurable) from a bucket
/// on every call.
#[derive(Debug, Clone)]
pub struct ObjectStoreKeyProvider {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    private_key_name: String,
    public_key_name: String,
}

impl ObjectStoreKeyProvider {
    /// Create a provider reading the objects named in `config`.
    pub fn new(config: &AuthConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            bucket: config.key_bucket.clone(),
            private_key_name: config.private_key_name.clone(),
            public_key_name: config.public_key_name.clone(),
        }
    }

    async fn fetch(&self, key: &str) -> Result<bytes::Bytes, AuthError> {
        self.store.get(&self.bucket, key).await.map_err(|e| {
            warn!(bucket = %self.bucket, key, error = %e, "Failed to fetch signing key");
            AuthError::KeyUnavailable(format!("{}/{key}: {}", self.bucket, e.message))
        })
    }
}

#[async_trait]
impl KeyProvider for ObjectStoreKeyProvider {
    async fn private_key(&self) -> Result<EncodingKey, AuthError> {
        let pem = self.fetch(&self.private_key_name).await?;
        parse_private_pem(&pem)
    }

    async fn public_key(&self) -> Result<DecodingKey, AuthError> {
        let pem = self.fetch(&self.public_key_name).await?;
        parse_public_pem(&pem)
    }
}

//! RSA signing key pair providers.

pub mod cached;
pub mod object_store;
pub mod static_keys;

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey};

use gabb_core::config::AuthConfig;
use gabb_core::traits::ObjectStore;

use crate::error::AuthError;

pub use cached::CachedKeyProvider;
pub use object_store::ObjectStoreKeyProvider;
pub use static_keys::StaticKeyProvider;

/// Supplies the key pair used to sign and verify tokens.
#[async_trait]
pub trait KeyProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The RSA private key used for signing.
    async fn private_key(&self) -> Result<EncodingKey, AuthError>;

    /// The RSA public key used for verification.
    async fn public_key(&self) -> Result<DecodingKey, AuthError>;
}

/// Build the configured provider: keys from object storage, cached when
/// `key_cache_ttl_seconds` is positive.
pub fn build_key_provider(
    config: &AuthConfig,
    store: Arc<dyn ObjectStore>,
) -> Arc<dyn KeyProvider> {
    let provider = ObjectStoreKeyProvider::new(config, store);
    if config.key_cache_ttl_seconds > 0 {
        Arc::new(CachedKeyProvider::new(
            Arc::new(provider),
            std::time::Duration::from_secs(config.key_cache_ttl_seconds),
        ))
    } else {
        Arc::new(provider)
    }
}

pub(crate) fn parse_private_pem(pem: &[u8]) -> Result<EncodingKey, AuthError> {
    EncodingKey::from_rsa_pem(pem)
        .map_err(|e| AuthError::KeyUnavailable(format!("malformed private key: {e}")))
}

pub(crate) fn parse_public_pem(pem: &[u8]) -> Result<DecodingKey, AuthError> {
    DecodingKey::from_rsa_pem(pem)
        .map_err(|e| AuthError::KeyUnavailable(format!("malformed public key: {e}")))
}

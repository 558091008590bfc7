//! Key pair held in memory.

use async_trait::async_trait;
use bytes::Bytes;
use jsonwebtoken::{DecodingKey, EncodingKey};

use super::{KeyProvider, parse_private_pem, parse_public_pem};
use crate::error::AuthError;

/// PEM bytes kept in memory and parsed on each call, so malformed
/// material fails the same way a bad object in storage does.
#[derive(Clone)]
pub struct StaticKeyProvider {
    private_pem: Bytes,
    public_pem: Bytes,
}

impl std::fmt::Debug for StaticKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyProvider")
            .field("public_pem_bytes", &self.public_pem.len())
            .finish_non_exhaustive()
    }
}

impl StaticKeyProvider {
    /// Create a provider from PEM-encoded private and public keys.
    pub fn new(private_pem: impl Into<Bytes>, public_pem: impl Into<Bytes>) -> Self {
        Self {
            private_pem: private_pem.into(),
            public_pem: public_pem.into(),
        }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn private_key(&self) -> Result<EncodingKey, AuthError> {
        parse_private_pem(&self.private_pem)
    }

    async fn public_key(&self) -> Result<DecodingKey, AuthError> {
        parse_public_pem(&self.public_pem)
    }
}

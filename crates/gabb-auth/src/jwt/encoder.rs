//! RS256 token signing.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, Header, encode};

use super::claims::Claims;
use crate::error::AuthError;
use crate::keys::KeyProvider;

/// Serializes and signs claim sets with the provider's private key.
///
/// RS256 (PKCS#1 v1.5) signatures are deterministic, so identical claims
/// and key always produce the same token.
#[derive(Debug, Clone)]
pub struct JwtEncoder {
    keys: Arc<dyn KeyProvider>,
}

impl JwtEncoder {
    /// Creates a new encoder over the given key provider.
    pub fn new(keys: Arc<dyn KeyProvider>) -> Self {
        Self { keys }
    }

    /// Signs `claims` into a compact JWT.
    pub async fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        let key = self.keys.private_key().await?;
        encode(&Header::new(Algorithm::RS256), claims, &key).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
            | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat => {
                AuthError::KeyUnavailable(format!("private key rejected: {e}"))
            }
            _ => AuthError::Issuance(format!("failed to sign token: {e}")),
        })
    }
}

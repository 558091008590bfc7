//! RS256 token verification.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode};

use super::claims::Claims;
use crate::clock::Clock;
use crate::error::{AuthError, DenyReason};
use crate::keys::KeyProvider;

/// Verifies signatures and expiry.
///
/// Expiry is checked against the injected clock with no leeway rather than
/// by `jsonwebtoken`, which reads the system clock.
#[derive(Debug, Clone)]
pub struct JwtDecoder {
    keys: Arc<dyn KeyProvider>,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl JwtDecoder {
    /// Creates a new decoder over the given key provider and clock.
    pub fn new(keys: Arc<dyn KeyProvider>, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys,
            clock,
            validation,
        }
    }

    /// Decodes and validates a token string.
    ///
    /// Checks, in order:
    /// 1. Structure and header algorithm
    /// 2. Signature against the public key
    /// 3. Claim shape (`exp` required)
    /// 4. Expiry
    pub async fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let key = self.keys.public_key().await?;
        let data = decode::<Claims>(token, &key, &self.validation).map_err(|e| match e.kind() {
            JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                AuthError::Denied(DenyReason::InvalidSignature)
            }
            JwtErrorKind::InvalidRsaKey(_) | JwtErrorKind::InvalidKeyFormat => {
                AuthError::KeyUnavailable(format!("public key rejected: {e}"))
            }
            _ => AuthError::Denied(DenyReason::MalformedToken),
        })?;

        let claims = data.claims;
        if claims.is_expired(self.clock.now()) {
            return Err(DenyReason::Expired.into());
        }
        Ok(claims)
    }
}

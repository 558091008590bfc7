//! Authorization failure taxonomy.
//!
//! Expected failures (bad, expired, reused, or wrong-scope tokens) are
//! [`DenyReason`]s and end up as a `Deny` verdict. Infrastructure failures
//! are the remaining [`AuthError`] variants and propagate as hard errors.

use gabb_core::error::AppError;
use thiserror::Error;

/// Why a bearer token was refused.
///
/// Reasons are diagnostic only; every deny is answered identically at the
/// HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DenyReason {
    /// No bearer token accompanied the request.
    #[error("No token provided")]
    NoTokenProvided,
    /// The token is not a structurally valid JWT or its claims do not parse.
    #[error("Token is invalid")]
    MalformedToken,
    /// The signature does not verify against the configured public key.
    #[error("Invalid token signature")]
    InvalidSignature,
    /// The token is at or past its `exp`.
    #[error("Token expired")]
    Expired,
    /// The token is on the revocation list.
    #[error("Token has already been used")]
    Revoked,
    /// The token does not carry the required scope.
    #[error("Insufficient scope")]
    InsufficientScope,
    /// The token's subject is not the resource owner.
    #[error("Token subject does not own this resource")]
    NotOwner,
}

/// Errors produced by the authorization and issuance components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// An expected authorization failure.
    #[error("{0}")]
    Denied(#[from] DenyReason),
    /// The key pair could not be fetched or parsed.
    #[error("Signing keys unavailable: {0}")]
    KeyUnavailable(String),
    /// The revocation list could not be read or written.
    #[error("Revocation store unavailable: {0}")]
    StoreUnavailable(String),
    /// A token could not be built or signed.
    #[error("Token issuance failed: {0}")]
    Issuance(String),
}

impl AuthError {
    /// Whether the error is an infrastructure failure rather than a deny.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Denied(_))
    }

    /// The deny reason, if this is an expected failure.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied(reason) => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn store(err: AppError) -> Self {
        Self::StoreUnavailable(err.message)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Denied(reason) => AppError::authentication(reason.to_string()),
            AuthError::KeyUnavailable(_) | AuthError::StoreUnavailable(_) => {
                AppError::service_unavailable(err.to_string())
            }
            AuthError::Issuance(_) => AppError::internal(err.to_string()),
        }
    }
}

//! Authorization engine: bearer token plus required scope (or owner) to an
//! allow/deny verdict.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AuthError, DenyReason};
use crate::jwt::{Claims, JwtDecoder};
use crate::revocation::RevocationStore;
use crate::scope;

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The token is acceptable; its claims are attached.
    Allow(Claims),
    /// The token is refused for the given reason.
    Deny(DenyReason),
}

impl Decision {
    /// Whether the verdict is `Allow`.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// The claims of an allowed token.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Allow(claims) => Some(claims),
            Self::Deny(_) => None,
        }
    }

    /// The reason of a denied token.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow(_) => None,
            Self::Deny(reason) => Some(*reason),
        }
    }

    /// Convert into a `Result` so handlers can use `?`.
    pub fn into_result(self) -> Result<Claims, AuthError> {
        match self {
            Self::Allow(claims) => Ok(claims),
            Self::Deny(reason) => Err(AuthError::Denied(reason)),
        }
    }
}

/// Combines the decoder and the revocation list into verdicts.
///
/// Expected failures never surface as `Err`: every method returns
/// `Ok(Decision::Deny(_))` for them and reserves `Err` for unreachable keys
/// or an unreachable revocation store.
#[derive(Debug, Clone)]
pub struct Authorizer {
    decoder: JwtDecoder,
    revocations: Arc<dyn RevocationStore>,
}

impl Authorizer {
    /// Creates a new authorizer.
    pub fn new(decoder: JwtDecoder, revocations: Arc<dyn RevocationStore>) -> Self {
        Self {
            decoder,
            revocations,
        }
    }

    /// Allow iff the token verifies, is not revoked, and carries
    /// `required_scope`.
    pub async fn authorize(
        &self,
        bearer: Option<&str>,
        required_scope: &str,
    ) -> Result<Decision, AuthError> {
        settle(self.scoped(bearer, required_scope).await)
    }

    /// Allow iff `authorize` would and the token's subject is `owner_id`.
    pub async fn authorize_owner(
        &self,
        bearer: Option<&str>,
        required_scope: &str,
        owner_id: &str,
    ) -> Result<Decision, AuthError> {
        settle(self.owned(bearer, required_scope, owner_id).await)
    }

    /// Allow iff the token carries `admin`, or it passes `authorize_owner`.
    ///
    /// The token is verified once; a non-admin token is then judged by the
    /// owner rule and its deny reason reported.
    pub async fn authorize_admin_or_owner(
        &self,
        bearer: Option<&str>,
        required_scope: &str,
        owner_id: &str,
    ) -> Result<Decision, AuthError> {
        let result = match self.verified(bearer).await {
            Ok((_, claims)) if claims.has_scope(scope::ADMIN) => Ok(claims),
            Ok((_, claims)) => check_owner(claims, required_scope, owner_id),
            Err(e) => Err(e),
        };
        settle(result)
    }

    /// Authorize a single-use token and consume it.
    ///
    /// The claim on the revocation list is atomic, so of two concurrent
    /// presentations of the same token only one is allowed.
    pub async fn consume(
        &self,
        bearer: Option<&str>,
        required_scope: &str,
    ) -> Result<Decision, AuthError> {
        let result = async {
            let (token, claims) = self.verified(bearer).await?;
            let claims = check_scope(claims, required_scope)?;
            if !self
                .revocations
                .claim(token)
                .await
                .map_err(AuthError::store)?
            {
                return Err(DenyReason::Revoked.into());
            }
            Ok(claims)
        }
        .await;
        settle(result)
    }

    /// Decode without consulting the revocation list, for inspection.
    pub async fn decode_for_display(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.decode(token.trim()).await
    }

    /// Put a token on the revocation list.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.revocations
            .mark_invalid(token.trim())
            .await
            .map_err(AuthError::store)
    }

    /// Take a token off the revocation list.
    pub async fn restore(&self, token: &str) -> Result<(), AuthError> {
        self.revocations
            .mark_valid(token.trim())
            .await
            .map_err(AuthError::store)
    }

    /// The revocation list this authorizer consults.
    pub fn revocations(&self) -> &Arc<dyn RevocationStore> {
        &self.revocations
    }

    async fn scoped(
        &self,
        bearer: Option<&str>,
        required_scope: &str,
    ) -> Result<Claims, AuthError> {
        let (_, claims) = self.verified(bearer).await?;
        check_scope(claims, required_scope)
    }

    async fn owned(
        &self,
        bearer: Option<&str>,
        required_scope: &str,
        owner_id: &str,
    ) -> Result<Claims, AuthError> {
        let (_, claims) = self.verified(bearer).await?;
        check_owner(claims, required_scope, owner_id)
    }

    /// Presence, signature, expiry, revocation, and non-empty scope.
    async fn verified<'a>(&self, bearer: Option<&'a str>) -> Result<(&'a str, Claims), AuthError> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(DenyReason::NoTokenProvided)?;

        let claims = self.decoder.decode(token).await?;

        if self
            .revocations
            .is_invalid(token)
            .await
            .map_err(AuthError::store)?
        {
            return Err(DenyReason::Revoked.into());
        }

        if claims.has_no_scope() {
            return Err(DenyReason::InsufficientScope.into());
        }

        Ok((token, claims))
    }
}

fn check_scope(claims: Claims, required_scope: &str) -> Result<Claims, AuthError> {
    if claims.has_scope(required_scope) {
        Ok(claims)
    } else {
        Err(DenyReason::InsufficientScope.into())
    }
}

fn check_owner(claims: Claims, required_scope: &str, owner_id: &str) -> Result<Claims, AuthError> {
    let claims = check_scope(claims, required_scope)?;
    if claims.subject_id() == Some(owner_id) {
        Ok(claims)
    } else {
        Err(DenyReason::NotOwner.into())
    }
}

/// Fold expected failures into `Deny`, pass fatal errors through.
fn settle(result: Result<Claims, AuthError>) -> Result<Decision, AuthError> {
    match result {
        Ok(claims) => Ok(Decision::Allow(claims)),
        Err(AuthError::Denied(reason)) => {
            debug!(reason = %reason, "Authorization denied");
            Ok(Decision::Deny(reason))
        }
        Err(e) => {
            warn!(error = %e, "Authorization infrastructure failure");
            Err(e)
        }
    }
}

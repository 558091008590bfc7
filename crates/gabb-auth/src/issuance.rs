//! Token issuance for each principal type and purpose.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::clock::Clock;
use crate::error::AuthError;
use crate::jwt::{Claims, JwtEncoder};
use crate::scope::{PrincipalType, TokenPurpose};

/// Lifetime of a person session token: 72 days.
pub const PERSON_TOKEN_TTL_SECONDS: i64 = 72 * 24 * 60 * 60;
/// Lifetime of an app token: 72 days.
pub const APP_TOKEN_TTL_SECONDS: i64 = 72 * 24 * 60 * 60;
/// Lifetime of an admin token: 1 hour.
pub const ADMIN_TOKEN_TTL_SECONDS: i64 = 60 * 60;
/// Lifetime of email-validation and password-reset tokens: 24 hours.
pub const SINGLE_PURPOSE_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
/// Lifetime of a test token: 60 seconds.
pub const TEST_TOKEN_TTL_SECONDS: i64 = 60;

/// A freshly signed token and the claims inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// The compact JWT.
    pub token: String,
    /// The signed claims.
    pub claims: Claims,
}

/// Builds claim sets and signs them.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    encoder: JwtEncoder,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Creates a new issuer.
    pub fn new(encoder: JwtEncoder, clock: Arc<dyn Clock>) -> Self {
        Self { encoder, clock }
    }

    /// Subject-less token for the app or an admin.
    ///
    /// Person tokens need a subject and go through [`Self::issue_for_person`].
    pub async fn issue_for_principal_type(
        &self,
        principal: PrincipalType,
    ) -> Result<IssuedToken, AuthError> {
        let ttl = match principal {
            PrincipalType::App => APP_TOKEN_TTL_SECONDS,
            PrincipalType::Admin => ADMIN_TOKEN_TTL_SECONDS,
            PrincipalType::Person => {
                return Err(AuthError::Issuance(
                    "person tokens require a subject id".to_string(),
                ));
            }
        };
        self.sign(None, principal.scope_claim(), ttl).await
    }

    /// Session token for a signed-in person.
    pub async fn issue_for_person(&self, person_id: &str) -> Result<IssuedToken, AuthError> {
        self.sign(
            Some(person_id.to_string()),
            PrincipalType::Person.scope_claim(),
            PERSON_TOKEN_TTL_SECONDS,
        )
        .await
    }

    /// Email-validation, password-reset, or test token bound to a person.
    pub async fn issue_single_purpose(
        &self,
        person_id: &str,
        purpose: TokenPurpose,
    ) -> Result<IssuedToken, AuthError> {
        self.sign(
            Some(person_id.to_string()),
            purpose.scope().to_string(),
            ttl_for_purpose(purpose),
        )
        .await
    }

    /// Short-lived subject-less token with scope `test`.
    pub async fn issue_test_token(&self) -> Result<IssuedToken, AuthError> {
        self.sign(
            None,
            TokenPurpose::Test.scope().to_string(),
            TEST_TOKEN_TTL_SECONDS,
        )
        .await
    }

    async fn sign(
        &self,
        subject_id: Option<String>,
        scope: String,
        ttl_seconds: i64,
    ) -> Result<IssuedToken, AuthError> {
        let claims = Claims::new(subject_id, scope, self.clock.now() + ttl_seconds);
        let token = self.encoder.encode(&claims).await?;
        info!(
            scope = claims.scope.as_deref().unwrap_or_default(),
            has_subject = claims.subject_id.is_some(),
            exp = claims.exp,
            "Issued token"
        );
        Ok(IssuedToken { token, claims })
    }
}

fn ttl_for_purpose(purpose: TokenPurpose) -> i64 {
    match purpose {
        TokenPurpose::ValidateEmail | TokenPurpose::ResetPassword => {
            SINGLE_PURPOSE_TOKEN_TTL_SECONDS
        }
        TokenPurpose::Test => TEST_TOKEN_TTL_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{NOW, TestAuth};

    #[tokio::test]
    async fn test_app_token() {
        let auth = TestAuth::new();
        let issued = auth
            .issuer
            .issue_for_principal_type(PrincipalType::App)
            .await
            .unwrap();
        assert_eq!(issued.claims.subject_id(), None);
        assert_eq!(
            issued.claims.scope.as_deref(),
            Some("create-person reset-password")
        );
        assert_eq!(issued.claims.exp, NOW + APP_TOKEN_TTL_SECONDS);
    }

    #[tokio::test]
    async fn test_admin_token_lasts_an_hour() {
        let auth = TestAuth::new();
        let issued = auth
            .issuer
            .issue_for_principal_type(PrincipalType::Admin)
            .await
            .unwrap();
        assert_eq!(issued.claims.exp, NOW + 3600);
        assert!(issued.claims.has_scope("admin"));
        assert!(issued.claims.has_scope("reset-password"));
    }

    #[tokio::test]
    async fn test_person_principal_needs_subject() {
        let auth = TestAuth::new();
        assert!(matches!(
            auth.issuer
                .issue_for_principal_type(PrincipalType::Person)
                .await,
            Err(AuthError::Issuance(_))
        ));
    }

    #[tokio::test]
    async fn test_person_token() {
        let auth = TestAuth::new();
        let issued = auth.issuer.issue_for_person("5f1c0ffee").await.unwrap();
        assert_eq!(issued.claims.subject_id(), Some("5f1c0ffee"));
        assert_eq!(issued.claims.scope.as_deref(), Some("can-read can-write"));
        assert_eq!(issued.claims.exp, NOW + 72 * 86_400);

        let decoded = auth
            .authorizer
            .decode_for_display(&issued.token)
            .await
            .unwrap();
        assert_eq!(decoded, issued.claims);
    }

    #[tokio::test]
    async fn test_single_purpose_tokens() {
        let auth = TestAuth::new();
        for purpose in [TokenPurpose::ValidateEmail, TokenPurpose::ResetPassword] {
            let issued = auth
                .issuer
                .issue_single_purpose("p1", purpose)
                .await
                .unwrap();
            assert_eq!(issued.claims.scopes().collect::<Vec<_>>(), vec![purpose.scope()]);
            assert_eq!(issued.claims.exp, NOW + 86_400);
            assert_eq!(issued.claims.subject_id(), Some("p1"));
        }
    }

    #[tokio::test]
    async fn test_test_token_expires_after_a_minute() {
        let auth = TestAuth::new();
        let issued = auth.issuer.issue_test_token().await.unwrap();
        assert_eq!(issued.claims.scope.as_deref(), Some("test"));
        assert_eq!(issued.claims.subject_id(), None);

        assert!(auth
            .authorizer
            .authorize(Some(&issued.token), "test")
            .await
            .unwrap()
            .is_allowed());

        auth.clock.advance(TEST_TOKEN_TTL_SECONDS);
        assert_eq!(
            auth.authorizer
                .authorize(Some(&issued.token), "test")
                .await
                .unwrap()
                .deny_reason(),
            Some(crate::DenyReason::Expired)
        );
    }

    #[tokio::test]
    async fn test_password_reset_token_single_use() {
        let auth = TestAuth::new();
        let issued = auth
            .issuer
            .issue_single_purpose("p1", TokenPurpose::ResetPassword)
            .await
            .unwrap();

        let first = auth
            .authorizer
            .consume(Some(&issued.token), "reset-password")
            .await
            .unwrap();
        assert!(first.is_allowed());

        let second = auth
            .authorizer
            .authorize(Some(&issued.token), "reset-password")
            .await
            .unwrap();
        assert_eq!(second.deny_reason(), Some(crate::DenyReason::Revoked));
    }

    #[tokio::test]
    async fn test_unavailable_keys_fail_issuance() {
        let auth = TestAuth::with_keys(crate::keys::StaticKeyProvider::new(
            &b"broken"[..],
            &b"broken"[..],
        ));
        assert!(matches!(
            auth.issuer.issue_test_token().await,
            Err(AuthError::KeyUnavailable(_))
        ));
    }
}

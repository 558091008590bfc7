//! Web flows completed by single-use tokens: email validation and
//! password reset.
//!
//! Both answer `204 No Content` on success and a bare `401` whenever the
//! token is refused. A token is consumed only once the request is
//! otherwise known to be acceptable, and is released again if the account
//! update it was consumed for fails.

use axum::extract::State;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};

use gabb_auth::scope;
use gabb_auth::{Claims, Decision};
use gabb_core::result::AppResult;

use crate::error::ApiError;
use crate::extractors::BearerToken;
use crate::state::AppState;

/// Body of `POST /reset_password`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    /// The new password.
    pub password: Option<String>,
}

/// POST /validate_email
pub async fn validate_email(
    State(state): State<AppState>,
    bearer: BearerToken,
) -> Result<StatusCode, ApiError> {
    let claims = allowed(
        state
            .authorizer
            .consume(bearer.as_deref(), scope::VALIDATE_EMAIL)
            .await?,
    )?;
    let person_id = subject(&claims)?;

    let updated = state.persons.mark_email_validated(person_id).await;
    release_on_failure(&state, bearer.as_deref(), updated).await?;

    info!(person_id = %person_id, "Email address validated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /reset_password
///
/// The body is parsed before the token is looked at so a malformed
/// request never burns it.
pub async fn reset_password(
    State(state): State<AppState>,
    bearer: BearerToken,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: ResetPasswordRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Malformed JSON"))?;

    let claims = allowed(
        state
            .authorizer
            .authorize(bearer.as_deref(), scope::RESET_PASSWORD)
            .await?,
    )?;
    let person_id = subject(&claims)?.to_string();

    let Some(password) = request.password else {
        return Err(ApiError::forbidden("Password is required"));
    };
    let password_hash = state.password_hasher.hash_password(&password)?;

    // Lost race against a concurrent presentation of the same token.
    allowed(
        state
            .authorizer
            .consume(bearer.as_deref(), scope::RESET_PASSWORD)
            .await?,
    )?;

    let updated = state
        .persons
        .set_password_hash(&person_id, &password_hash)
        .await;
    release_on_failure(&state, bearer.as_deref(), updated).await?;

    info!(person_id = %person_id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// Take a consumed token off the revocation list when the update it was
/// consumed for failed, so the emailed link still works on retry.
async fn release_on_failure(
    state: &AppState,
    token: Option<&str>,
    updated: AppResult<()>,
) -> Result<(), ApiError> {
    let Err(err) = updated else {
        return Ok(());
    };
    if let Some(token) = token {
        if let Err(restore_err) = state.authorizer.restore(token).await {
            warn!(error = %restore_err, "Failed to release single-use token");
        }
    }
    Err(err.into())
}

fn allowed(decision: Decision) -> Result<Claims, ApiError> {
    match decision {
        Decision::Allow(claims) => Ok(claims),
        Decision::Deny(_) => Err(ApiError::unauthorized()),
    }
}

fn subject(claims: &Claims) -> Result<&str, ApiError> {
    claims.subject_id().ok_or_else(ApiError::unauthorized)
}

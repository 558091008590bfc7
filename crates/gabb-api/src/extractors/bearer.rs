//! `BearerToken` extractor: the raw token from the Authorization header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// The token from `Authorization: Bearer <token>`, if present.
///
/// Never rejects: a missing or malformed header yields `None` so the
/// authorizer can answer it like any other refused token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    /// Borrow the token.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Parse `Bearer <token>` (scheme matched case-insensitively).
pub fn parse_authorization(value: &str) -> Option<String> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") || parts.next().is_some() {
        return None;
    }
    Some(token.to_string())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_authorization);
        Ok(Self(token))
    }
}

//! Claim set carried by every Gabb token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded JWT payload.
///
/// The subject travels under the claim name `id` because tokens already
/// held by mobile clients use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject person id. Absent for app and admin tokens.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    /// Space-delimited scope names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Build a claim set.
    pub fn new(subject_id: Option<String>, scope: impl Into<String>, exp: i64) -> Self {
        Self {
            subject_id,
            scope: Some(scope.into()),
            exp,
        }
    }

    /// Returns the subject id, if any.
    pub fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }

    /// Iterates over the individual scope names.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.as_deref().unwrap_or_default().split_whitespace()
    }

    /// Whole-name scope membership: `can-read` never matches `read`.
    pub fn has_scope(&self, name: &str) -> bool {
        self.scopes().any(|s| s == name)
    }

    /// Whether the token carries no scope at all.
    pub fn has_no_scope(&self) -> bool {
        self.scopes().next().is_none()
    }

    /// Checks whether this token has expired at `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

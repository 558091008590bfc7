//! Revocation record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `tokens` table.
///
/// Rows only exist for single-use tokens that have been presented at least
/// once (or revoked by an operator). A token without a row is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RevocationRecord {
    /// The full signed token string. Unique.
    pub value: String,
    /// Whether the token has been used up or revoked.
    pub is_invalid: bool,
    /// When the row was first written.
    pub created_at: DateTime<Utc>,
    /// When the flag last changed.
    pub updated_at: DateTime<Utc>,
}

impl RevocationRecord {
    /// Build a fresh record stamped with the current time.
    pub fn new(value: impl Into<String>, is_invalid: bool) -> Self {
        let now = Utc::now();
        Self {
            value: value.into(),
            is_invalid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip the flag and bump `updated_at`.
    pub fn set_invalid(&mut self, is_invalid: bool) {
        self.is_invalid = is_invalid;
        self.updated_at = Utc::now();
    }
}

//! Revocation list for single-use tokens.
//!
//! A token with no record is valid. Email-validation and password-reset
//! tokens get a record the first time they are consumed, and any later
//! presentation is refused even though signature and expiry still check
//! out.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use gabb_core::result::AppResult;
use gabb_entity::token::RevocationRecord;

pub use memory::MemoryRevocationStore;
pub use postgres::PostgresRevocationStore;

/// Persistent set of used or revoked token strings.
#[async_trait]
pub trait RevocationStore: Send + Sync + std::fmt::Debug + 'static {
    /// True only if a record exists with the invalid flag set.
    async fn is_invalid(&self, token: &str) -> AppResult<bool>;

    /// Upsert the record with the flag set. Idempotent.
    async fn mark_invalid(&self, token: &str) -> AppResult<()>;

    /// Clear the flag on an existing record. Absent tokens stay absent.
    async fn mark_valid(&self, token: &str) -> AppResult<()>;

    /// Atomically set the flag if the token is absent or valid.
    ///
    /// Returns `true` if this call made the transition and `false` if the
    /// token was already invalid. Among concurrent callers for one token at
    /// most one observes `true`.
    async fn claim(&self, token: &str) -> AppResult<bool>;

    /// Look up the record for inspection.
    async fn find(&self, token: &str) -> AppResult<Option<RevocationRecord>>;
}

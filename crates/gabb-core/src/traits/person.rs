//! Person directory used by the single-use token flows.

use async_trait::async_trait;

use crate::result::AppResult;

/// The slice of the person store that email validation and password reset
/// need.
///
/// Ids are the opaque subject ids carried in tokens. Unknown ids fail with
/// a `NotFound` error.
#[async_trait]
pub trait PersonDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Flag the person's email address as validated.
    async fn mark_email_validated(&self, person_id: &str) -> AppResult<()>;

    /// Replace the person's stored password hash.
    async fn set_password_hash(&self, person_id: &str, password_hash: &str) -> AppResult<()>;
}

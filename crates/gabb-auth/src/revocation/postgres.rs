//! PostgreSQL-backed revocation list.

use async_trait::async_trait;

use gabb_core::result::AppResult;
use gabb_database::repositories::TokenRepository;
use gabb_entity::token::RevocationRecord;

use super::RevocationStore;

/// Revocation list over the `tokens` table.
///
/// `claim` is a single conditional upsert, so concurrent presentations
/// across server instances still yield one winner.
#[derive(Debug, Clone)]
pub struct PostgresRevocationStore {
    tokens: TokenRepository,
}

impl PostgresRevocationStore {
    /// Create a store over the token repository.
    pub fn new(tokens: TokenRepository) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl RevocationStore for PostgresRevocationStore {
    async fn is_invalid(&self, token: &str) -> AppResult<bool> {
        self.tokens.is_invalid(token).await
    }

    async fn mark_invalid(&self, token: &str) -> AppResult<()> {
        self.tokens.upsert(token, true).await
    }

    async fn mark_valid(&self, token: &str) -> AppResult<()> {
        self.tokens.clear_invalid(token).await.map(|_| ())
    }

    async fn claim(&self, token: &str) -> AppResult<bool> {
        self.tokens.claim(token).await
    }

    async fn find(&self, token: &str) -> AppResult<Option<RevocationRecord>> {
        self.tokens.find_by_value(token).await
    }
}

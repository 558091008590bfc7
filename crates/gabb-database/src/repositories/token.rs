//! Revocation list repository over the `tokens` table.

use sqlx::PgPool;

use gabb_core::error::{AppError, ErrorKind};
use gabb_core::result::AppResult;
use gabb_entity::token::RevocationRecord;

/// Repository for the single-use token revocation list.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the record for a token value.
    pub async fn find_by_value(&self, value: &str) -> AppResult<Option<RevocationRecord>> {
        sqlx::query_as::<_, RevocationRecord>(
            "SELECT value, is_invalid, created_at, updated_at FROM tokens WHERE value = $1",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find token", e))
    }

    /// Whether a record exists with the invalid flag set.
    pub async fn is_invalid(&self, value: &str) -> AppResult<bool> {
        let invalid: Option<bool> =
            sqlx::query_scalar("SELECT is_invalid FROM tokens WHERE value = $1")
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to check token", e)
                })?;
        Ok(invalid.unwrap_or(false))
    }

    /// Insert or update the record with the given flag.
    pub async fn upsert(&self, value: &str, is_invalid: bool) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tokens (value, is_invalid) VALUES ($1, $2) \
             ON CONFLICT (value) DO UPDATE \
             SET is_invalid = EXCLUDED.is_invalid, updated_at = NOW()",
        )
        .bind(value)
        .bind(is_invalid)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store token", e))?;
        Ok(())
    }

    /// Clear the invalid flag on an existing record. Returns whether a row
    /// was touched.
    pub async fn clear_invalid(&self, value: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE tokens SET is_invalid = FALSE, updated_at = NOW() WHERE value = $1",
        )
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore token", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically flip a token from valid (or absent) to invalid.
    ///
    /// Returns `true` only for the caller whose statement performed the
    /// transition. The conditional `DO UPDATE .. WHERE` returns no row when
    /// the token was already invalid.
    pub async fn claim(&self, value: &str) -> AppResult<bool> {
        let claimed: Option<String> = sqlx::query_scalar(
            "INSERT INTO tokens (value, is_invalid) VALUES ($1, TRUE) \
             ON CONFLICT (value) DO UPDATE SET is_invalid = TRUE, updated_at = NOW() \
             WHERE tokens.is_invalid = FALSE \
             RETURNING value",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim token", e))?;
        Ok(claimed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gabb_core::config::DatabaseConfig;

    use super::*;
    use crate::connection::DatabasePool;
    use crate::migration::run_migrations;

    // Run with: DATABASE_URL=postgres://... cargo test -p gabb-database -- --ignored

    async fn repository() -> TokenRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = DatabasePool::connect(&DatabaseConfig {
            url,
            max_connections: 16,
            min_connections: 0,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 30,
        })
        .await
        .unwrap();
        run_migrations(db.pool()).await.unwrap();
        db.tokens()
    }

    fn fresh_value() -> String {
        format!("test-token-{}", uuid::Uuid::new_v4())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_claim_succeeds_once() {
        let tokens = repository().await;
        let value = fresh_value();

        assert!(!tokens.is_invalid(&value).await.unwrap());
        assert!(tokens.claim(&value).await.unwrap());
        assert!(!tokens.claim(&value).await.unwrap());
        assert!(tokens.is_invalid(&value).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_clear_invalid_reopens_claim() {
        let tokens = repository().await;
        let value = fresh_value();

        assert!(!tokens.clear_invalid(&value).await.unwrap());

        assert!(tokens.claim(&value).await.unwrap());
        assert!(tokens.clear_invalid(&value).await.unwrap());
        assert!(!tokens.is_invalid(&value).await.unwrap());
        assert!(tokens.claim(&value).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL"]
    async fn test_upsert_sets_flag() {
        let tokens = repository().await;
        let value = fresh_value();

        assert!(tokens.find_by_value(&value).await.unwrap().is_none());

        tokens.upsert(&value, true).await.unwrap();
        let record = tokens.find_by_value(&value).await.unwrap().unwrap();
        assert_eq!(record.value, value);
        assert!(record.is_invalid);
        assert!(!tokens.claim(&value).await.unwrap());

        tokens.upsert(&value, false).await.unwrap();
        assert!(!tokens.is_invalid(&value).await.unwrap());
        assert!(tokens.claim(&value).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires PostgreSQL"]
    async fn test_concurrent_claims_have_one_winner() {
        let tokens = Arc::new(repository().await);
        let value = Arc::new(fresh_value());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let tokens = tokens.clone();
            let value = value.clone();
            handles.push(tokio::spawn(async move { tokens.claim(&value).await.unwrap() }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}

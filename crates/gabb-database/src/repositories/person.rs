//! Person repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gabb_core::error::{AppError, ErrorKind};
use gabb_core::result::AppResult;
use gabb_core::traits::PersonDirectory;

/// Repository for the token-driven account updates.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    /// Create a new person repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update_one(&self, sql: &str, id: Uuid, value: Option<&str>) -> AppResult<()> {
        let mut query = sqlx::query(sql).bind(id);
        if let Some(value) = value {
            query = query.bind(value.to_string());
        }
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update person", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Person {id} not found")));
        }
        Ok(())
    }
}

/// Subject ids that are not UUIDs cannot name a row.
fn parse_person_id(person_id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(person_id)
        .map_err(|_| AppError::not_found(format!("Person {person_id} not found")))
}

#[async_trait]
impl PersonDirectory for PersonRepository {
    async fn mark_email_validated(&self, person_id: &str) -> AppResult<()> {
        let id = parse_person_id(person_id)?;
        self.update_one(
            "UPDATE persons SET email_address_validated = TRUE, updated_at = NOW() WHERE id = $1",
            id,
            None,
        )
        .await
    }

    async fn set_password_hash(&self, person_id: &str, password_hash: &str) -> AppResult<()> {
        let id = parse_person_id(person_id)?;
        self.update_one(
            "UPDATE persons SET hashed_password = $2, updated_at = NOW() WHERE id = $1",
            id,
            Some(password_hash),
        )
        .await
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use crate::users::repo_types::{User, UserRow};

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let duplicate = matches!(
            &e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
        );
        if duplicate {
            StoreError::DuplicateEmail
        } else {
            StoreError::Database(e)
        }
    }
}

/// Operations on the `users` table. Each call is a single atomic statement.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a record and return its id.
    async fn insert(&self, name: &str, email: &str) -> Result<i32, StoreError>;
    /// Update name and email and refresh `updated_at`. Returns the affected row count.
    async fn update(&self, id: i32, name: &str, email: &str) -> Result<u64, StoreError>;
    /// Hard-delete a record. Returns the affected row count.
    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(name = "insert user", skip(self, name))]
    async fn insert(&self, name: &str, email: &str) -> Result<i32, StoreError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    #[instrument(name = "update user", skip(self, name))]
    async fn update(&self, id: i32, name: &str, email: &str) -> Result<u64, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET name = $1, email = $2, updated_at = CURRENT_TIMESTAMP
             WHERE id = $3
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    #[instrument(name = "delete user", skip(self))]
    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    #[instrument(name = "list users", skip(self))]
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
              FROM users
             ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

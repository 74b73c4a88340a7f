use axum::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User};
use crate::error::ApiError;

/// Persistence capabilities the auth workflows need from an account store.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, ApiError>;
    /// A unique-violation race on email maps to `EmailTaken`.
    async fn create(&self, new: NewUser) -> Result<User, ApiError>;
    async fn touch_last_login(&self, id: i64) -> Result<(), ApiError>;
}

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, last_login,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, last_login,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ApiError> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        Ok(exists.0)
    }

    async fn create(&self, new: NewUser) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, full_name, is_active, last_login,
                      created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.full_name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return ApiError::EmailTaken;
                }
            }
            ApiError::from(e)
        })?;
        Ok(user)
    }

    async fn touch_last_login(&self, id: i64) -> Result<(), ApiError> {
        sqlx::query(r#"UPDATE users SET last_login = now(), updated_at = now() WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

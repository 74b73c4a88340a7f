use axum::async_trait;
use sqlx::PgPool;

use crate::cards::repo_types::{Card, NewCard};
use crate::error::ApiError;

/// Persistence capabilities for cards. `list_by_user` returns newest first.
#[async_trait]
pub trait CardRepo: Send + Sync {
    async fn create(&self, new: NewCard) -> Result<Card, ApiError>;
    async fn get(&self, id: i64) -> Result<Option<Card>, ApiError>;
    async fn delete(&self, id: i64) -> Result<bool, ApiError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Card>, ApiError>;
}

pub struct PgCardRepo {
    db: PgPool,
}

impl PgCardRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CardRepo for PgCardRepo {
    async fn create(&self, new: NewCard) -> Result<Card, ApiError> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (user_id, title, description, price, photo_path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, price, photo_path, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.photo_path)
        .fetch_one(&self.db)
        .await?;
        Ok(card)
    }

    async fn get(&self, id: i64) -> Result<Option<Card>, ApiError> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, user_id, title, description, price, photo_path, created_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(card)
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query(r#"DELETE FROM cards WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Card>, ApiError> {
        let rows = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, user_id, title, description, price, photo_path, created_at
            FROM cards
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Card record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub photo_path: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub photo_path: String,
}

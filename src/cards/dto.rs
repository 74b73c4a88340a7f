use serde::Serialize;
use time::OffsetDateTime;

use crate::cards::repo_types::Card;

/// Card as returned to the client.
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub photo_path: String,
    pub created_at: OffsetDateTime,
}

impl From<Card> for CardResponse {
    fn from(c: Card) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            description: c.description,
            price: c.price,
            photo_path: c.photo_path,
            created_at: c.created_at,
        }
    }
}

/// Card fields collected from the multipart upload form.
#[derive(Debug)]
pub struct CardForm {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
}

impl CardForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".into());
        }
        if self.title.len() > 100 {
            return Err("title too long (max 100)".into());
        }
        if let Some(d) = &self.description {
            if d.len() > 500 {
                return Err("description too long (max 500)".into());
            }
        }
        if !(self.price > 0.0) {
            return Err("price must be greater than zero".into());
        }
        Ok(())
    }
}

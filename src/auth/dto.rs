use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Public part of the user returned after registration.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
}

/// Profile returned from /users/me. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserOut {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            is_active: u.is_active,
            last_login: u.last_login,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_out_has_no_password_field() {
        let now = OffsetDateTime::now_utc();
        let out = UserOut::from(User {
            id: 1,
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            full_name: Some("A".into()),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("a@x.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}

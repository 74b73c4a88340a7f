use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::auth::repo_types::User;
use crate::auth::services::resolve_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the bearer token, validates it and loads the account it names.
/// Protected handlers take this as an argument; rejection is the final
/// response for the request.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized("missing Authorization header"))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthorized("invalid auth scheme"))?;

        let user = resolve_user(state, token).await?;
        Ok(CurrentUser(user))
    }
}

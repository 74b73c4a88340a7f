use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, PublicUser, RegisterRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{NewUser, User};
use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create an account. The uniqueness pre-check and the insert together behave
/// as one logical operation: a concurrent registration racing past the check
/// hits the unique constraint, which the repo maps to the same `EmailTaken`.
pub async fn register(state: &AppState, mut req: RegisterRequest) -> Result<PublicUser, ApiError> {
    req.email = req.email.trim().to_lowercase();

    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "register: invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }
    if req.password.len() < 8 {
        warn!("register: password too short");
        return Err(ApiError::Validation("password too short".into()));
    }
    if state.users.exists_by_email(&req.email).await? {
        warn!(email = %req.email, "register: email already registered");
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(NewUser {
            email: req.email,
            password_hash,
            full_name: req.full_name,
        })
        .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(PublicUser {
        id: user.id,
        email: user.email,
    })
}

/// Verify credentials and issue a bearer token. Unknown email and bad
/// password are indistinguishable to the caller.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<String, ApiError> {
    let email = req.email.trim().to_lowercase();

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login: unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "login: invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    if let Err(e) = state.users.touch_last_login(user.id).await {
        warn!(user_id = user.id, error = %e, "login: failed to stamp last_login");
    }

    let token = JwtKeys::from_ref(state).sign_access(user.id)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(token)
}

/// Validate a bearer token and load the account it names. Gates every
/// protected operation; side-effect-free.
pub async fn resolve_user(state: &AppState, token: &str) -> Result<User, ApiError> {
    let claims = JwtKeys::from_ref(state).verify(token)?;
    state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(ApiError::NotFound("user"))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-scoped failure taxonomy. Every variant maps to exactly one
/// status code; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("storage error")]
    Storage(#[source] anyhow::Error),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::EmailTaken => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(e).context("database error"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                ApiError::Storage(cause) => error!(error = %cause, "storage failure"),
                ApiError::Internal(cause) => error!(error = %cause, "internal failure"),
                _ => {}
            }
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_contract() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthorized("invalid or expired token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound("user").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::UnsupportedMediaType("text/plain".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::Storage(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_the_cause() {
        let msg = ApiError::Storage(anyhow::anyhow!("open /photos: permission denied")).to_string();
        assert_eq!(msg, "storage error");
    }
}

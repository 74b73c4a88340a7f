use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use crate::auth::extractors::CurrentUser;
use crate::cards::dto::{CardForm, CardResponse};
use crate::cards::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/cards", get(list_cards))
        .route("/cards/photos/archive", get(download_photo_archive))
        .route("/cards/:id", get(get_card))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/cards", post(create_card))
        .route("/cards/:id", delete(delete_card))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// POST /cards (multipart)
/// Fields: title, description (optional), price, file.
#[instrument(skip(state, user, mp))]
pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut price: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = mp.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => title = Some(field.text().await.map_err(bad_multipart)?),
            Some("description") => description = Some(field.text().await.map_err(bad_multipart)?),
            Some("price") => price = Some(field.text().await.map_err(bad_multipart)?),
            Some("file") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let data = field.bytes().await.map_err(bad_multipart)?;
                file = Some((content_type, data));
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| ApiError::Validation("title is required".into()))?;
    let price = price
        .ok_or_else(|| ApiError::Validation("price is required".into()))?
        .parse::<f64>()
        .map_err(|_| ApiError::Validation("price must be a number".into()))?;
    let (content_type, body) =
        file.ok_or_else(|| ApiError::Validation("file is required".into()))?;
    let description = description.filter(|d| !d.trim().is_empty());

    let form = CardForm {
        title,
        description,
        price,
    };
    let card = services::create_with_photo(&state, &user, form, &content_type, body).await?;
    Ok((StatusCode::CREATED, Json(card.into())))
}

#[instrument(skip(state, user))]
pub async fn list_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CardResponse>>, ApiError> {
    let cards = state.cards.list_by_user(user.id).await?;
    Ok(Json(cards.into_iter().map(CardResponse::from).collect()))
}

#[instrument(skip(state, user))]
pub async fn get_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<CardResponse>, ApiError> {
    let card = services::get_owned(&state, user.id, id).await?;
    Ok(Json(card.into()))
}

#[instrument(skip(state, user))]
pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    services::delete_owned(&state, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /cards/photos/archive — every photo of the caller's cards as one ZIP.
#[instrument(skip(state, user))]
pub async fn download_photo_archive(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    match services::photo_archive(&state, user.id).await? {
        Some(buf) => Ok((
            [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"photos.zip\"",
                ),
            ],
            buf,
        )),
        None => Err(ApiError::NotFound("photo archive")),
    }
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("invalid multipart body: {e}"))
}

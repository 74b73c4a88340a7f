use bytes::Bytes;
use tracing::{info, warn};

use crate::auth::repo_types::User;
use crate::cards::dto::CardForm;
use crate::cards::repo_types::{Card, NewCard};
use crate::error::ApiError;
use crate::photos::archive::{build_zip, ArchiveEntry};
use crate::photos::services::{load_photo, save_photo};
use crate::state::AppState;

/// Persist the uploaded photo, then record the card pointing at it. The photo
/// write happens first so `photo_path` always references a stored object at
/// creation time; there is no transactional guarantee between the two.
pub async fn create_with_photo(
    state: &AppState,
    user: &User,
    form: CardForm,
    content_type: &str,
    body: Bytes,
) -> Result<Card, ApiError> {
    form.validate().map_err(ApiError::Validation)?;

    let photo_path = save_photo(state.photos.as_ref(), &user.email, content_type, body).await?;
    let card = state
        .cards
        .create(NewCard {
            user_id: user.id,
            title: form.title,
            description: form.description,
            price: form.price,
            photo_path,
        })
        .await?;

    info!(card_id = card.id, user_id = user.id, "card created");
    Ok(card)
}

/// Load a card, treating another user's card as absent.
pub async fn get_owned(state: &AppState, user_id: i64, card_id: i64) -> Result<Card, ApiError> {
    match state.cards.get(card_id).await? {
        Some(card) if card.user_id == user_id => Ok(card),
        _ => Err(ApiError::NotFound("card")),
    }
}

/// Delete a card the caller owns. The stored photo file is intentionally left
/// behind; see DESIGN.md.
pub async fn delete_owned(state: &AppState, user_id: i64, card_id: i64) -> Result<(), ApiError> {
    let card = get_owned(state, user_id, card_id).await?;
    if !state.cards.delete(card.id).await? {
        return Err(ApiError::NotFound("card"));
    }
    info!(card_id = card.id, user_id, "card deleted");
    Ok(())
}

/// Collect the user's photos and bundle them as a ZIP. Missing or unreadable
/// photos are skipped; the configured caps truncate the collection rather
/// than fail the request. `None` means there is nothing to archive.
pub async fn photo_archive(state: &AppState, user_id: i64) -> Result<Option<Vec<u8>>, ApiError> {
    let cards = state.cards.list_by_user(user_id).await?;
    if cards.is_empty() {
        return Ok(None);
    }

    let caps = &state.config.archive;
    let mut entries: Vec<ArchiveEntry> = Vec::new();
    let mut total_bytes: u64 = 0;

    for card in &cards {
        if entries.len() >= caps.max_photos {
            warn!(
                user_id,
                cards = cards.len(),
                cap = caps.max_photos,
                "archive photo cap reached, truncating"
            );
            break;
        }
        match load_photo(state.photos.as_ref(), &card.photo_path).await {
            Ok(Some(body)) => {
                if total_bytes + body.len() as u64 > caps.max_total_bytes {
                    warn!(
                        user_id,
                        total_bytes,
                        cap = caps.max_total_bytes,
                        "archive byte budget reached, truncating"
                    );
                    break;
                }
                total_bytes += body.len() as u64;
                entries.push(ArchiveEntry {
                    name: card.photo_path.clone(),
                    body,
                });
            }
            Ok(None) => {
                warn!(card_id = card.id, photo = %card.photo_path, "photo missing, skipping")
            }
            Err(e) => {
                warn!(card_id = card.id, photo = %card.photo_path, error = %e, "photo load failed, skipping")
            }
        }
    }

    build_zip(entries).map_err(ApiError::Storage)
}

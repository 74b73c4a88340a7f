use bytes::Bytes;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::storage::PhotoStore;

/// Allowed upload types. Anything else is rejected before touching storage.
fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

/// Derive a storage name from the uploader's identity and the current time.
/// A random nonce goes into the hash as well, so two uploads at the same
/// instant cannot collide.
pub fn derive_photo_name(email: &str, content_type: &str) -> Result<String, ApiError> {
    let ext = ext_from_mime(content_type)
        .ok_or_else(|| ApiError::UnsupportedMediaType(content_type.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(
        OffsetDateTime::now_utc()
            .unix_timestamp_nanos()
            .to_be_bytes(),
    );
    hasher.update(Uuid::new_v4().as_bytes());
    Ok(format!("{}.{}", hex::encode(hasher.finalize()), ext))
}

/// Validate the content type, derive a name and persist the bytes.
/// Returns the stored location.
pub async fn save_photo(
    store: &dyn PhotoStore,
    email: &str,
    content_type: &str,
    body: Bytes,
) -> Result<String, ApiError> {
    let name = derive_photo_name(email, content_type)?;
    let location = store
        .save(&name, body)
        .await
        .map_err(ApiError::Storage)?;
    debug!(%location, "photo stored");
    Ok(location)
}

pub async fn load_photo(store: &dyn PhotoStore, location: &str) -> Result<Option<Bytes>, ApiError> {
    store.load(location).await.map_err(ApiError::Storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::async_trait;

    #[test]
    fn derived_names_keep_extension_and_differ() {
        let a = derive_photo_name("a@x.com", "image/jpeg").unwrap();
        let b = derive_photo_name("a@x.com", "image/jpeg").unwrap();
        assert!(a.ends_with(".jpg"));
        assert!(b.ends_with(".jpg"));
        assert_ne!(a, b);

        let p = derive_photo_name("a@x.com", "image/png").unwrap();
        assert!(p.ends_with(".png"));
    }

    #[test]
    fn derive_rejects_disallowed_types() {
        for ct in ["text/plain", "image/webp", "application/octet-stream", ""] {
            let err = derive_photo_name("a@x.com", ct).unwrap_err();
            assert!(matches!(err, ApiError::UnsupportedMediaType(_)));
        }
    }

    /// Fails the test if any write reaches storage.
    struct RejectingStore;

    #[async_trait]
    impl PhotoStore for RejectingStore {
        async fn save(&self, _name: &str, _body: Bytes) -> anyhow::Result<String> {
            panic!("save must not be called for rejected content types");
        }
        async fn load(&self, _location: &str) -> anyhow::Result<Option<Bytes>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn save_photo_rejects_before_writing() {
        let err = save_photo(
            &RejectingStore,
            "a@x.com",
            "text/plain",
            Bytes::from_static(b"not an image"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMediaType(_)));
    }

    struct FailingStore;

    #[async_trait]
    impl PhotoStore for FailingStore {
        async fn save(&self, _name: &str, _body: Bytes) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("disk full"))
        }
        async fn load(&self, _location: &str) -> anyhow::Result<Option<Bytes>> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[tokio::test]
    async fn io_failures_surface_as_storage_errors() {
        let err = save_photo(&FailingStore, "a@x.com", "image/png", Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));

        let err = load_photo(&FailingStore, "x.png").await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}

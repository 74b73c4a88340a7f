use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

/// Content storage for uploaded photos. `load` treats a missing object as an
/// absent value, never an error.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn save(&self, name: &str, body: Bytes) -> anyhow::Result<String>;
    async fn load(&self, location: &str) -> anyhow::Result<Option<Bytes>>;
}

/// Filesystem store rooted at the configured content directory. Locations are
/// bare file names relative to the root.
#[derive(Clone)]
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> anyhow::Result<PathBuf> {
        // Strip any directory components so a location can never escape the root.
        let base = Path::new(name)
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("invalid photo location: {name:?}"))?;
        Ok(self.root.join(base))
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn save(&self, name: &str, body: Bytes) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create photo dir {}", self.root.display()))?;
        let path = self.path_for(name)?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write photo {}", path.display()))?;
        Ok(name.to_string())
    }

    async fn load(&self, location: &str) -> anyhow::Result<Option<Bytes>> {
        let path = self.path_for(location)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context(format!("read photo {}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsPhotoStore::new(dir.path());
        let location = store
            .save("abc123.jpg", Bytes::from_static(b"jpeg-bytes"))
            .await
            .expect("save");
        assert_eq!(location, "abc123.jpg");
        let loaded = store.load(&location).await.expect("load");
        assert_eq!(loaded, Some(Bytes::from_static(b"jpeg-bytes")));
    }

    #[tokio::test]
    async fn load_missing_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsPhotoStore::new(dir.path());
        let loaded = store.load("nope.png").await.expect("load should not error");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_creates_root_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("content").join("photos");
        let store = FsPhotoStore::new(&nested);
        store
            .save("a.png", Bytes::from_static(b"png"))
            .await
            .expect("save into missing dir");
        assert!(nested.join("a.png").exists());
    }

    #[tokio::test]
    async fn locations_cannot_escape_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsPhotoStore::new(dir.path());
        store
            .save("../escape.jpg", Bytes::from_static(b"x"))
            .await
            .expect("save");
        assert!(dir.path().join("escape.jpg").exists());
        assert!(!dir.path().parent().unwrap().join("escape.jpg").exists());
    }
}

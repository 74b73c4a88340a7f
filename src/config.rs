use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Caps for the in-memory photo archive.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub max_photos: usize,
    pub max_total_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub photo_dir: PathBuf,
    pub archive: ArchiveConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cardbox".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cardbox-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        let photo_dir = std::env::var("PHOTO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./photos"));
        let archive = ArchiveConfig {
            max_photos: std::env::var("ARCHIVE_MAX_PHOTOS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(200),
            max_total_bytes: std::env::var("ARCHIVE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(256 * 1024 * 1024),
        };
        Ok(Self {
            database_url,
            jwt,
            photo_dir,
            archive,
        })
    }
}

//! Service settings
//!
//! Defaults are layered under environment variables prefixed `SEASTAY__`,
//! with `__` separating nested keys, e.g. `SEASTAY__AUTH__JWT_SECRET` or
//! `SEASTAY__STORAGE__PUBLIC_URL`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Default upload limit for decoded image bytes (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Verification settings for the identity provider's tokens
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Shared HS256 secret
    pub jwt_secret: String,
    /// Expected `aud` claim
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub bucket: String,
    /// Base URL objects are served from
    pub public_url: Option<String>,
    /// S3 endpoint override for S3-compatible stores
    pub endpoint: Option<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from defaults and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001_i64)?
            .set_default("auth.audience", "authenticated")?
            .set_default("storage.bucket", "place-images")?
            .set_default("storage.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .add_source(
                Environment::with_prefix("SEASTAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

use std::path::PathBuf;

use common::storage::s3::S3Settings;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Company session tokens issued by this service.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
    7
}

/// Signing algorithm of user tokens issued by the identity provider.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum IdentityAlgorithm {
    /// Shared secret.
    HS256,
    /// PEM-encoded RSA public key.
    RS256,
}

/// Identity provider that authenticates job seekers.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    pub algorithm: IdentityAlgorithm,
    /// HS256 secret or RS256 PEM public key.
    pub key: String,
    /// Expected `iss` claim, if the provider sets one.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Webhook signing secret (`whsec_...`).
    pub webhook_secret: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    pub base_path: PathBuf,
    /// Public URL prefix the server exposes stored files under.
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
    /// Where multipart uploads are spooled before being stored.
    /// Falls back to the OS temp directory.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    pub filesystem: FilesystemStorageConfig,
    #[serde(default)]
    pub s3: Option<S3Settings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PORTAL_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default(
                "server.cors.allow_origins",
                vec!["http://localhost:5173".to_string()],
            )?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("identity.algorithm", "RS256")?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
            .set_default("storage.filesystem.base_path", "./data/media")?
            .set_default(
                "storage.filesystem.public_base_url",
                "http://127.0.0.1:5000/media",
            )?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., PORTAL__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl StorageConfig {
    pub fn upload_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token configuration.
    pub auth: AuthConfig,
    /// Media storage configuration.
    #[serde(default)]
    pub media: MediaConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
    /// Allowed CORS origin. `None` allows any origin.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connect/acquire timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Access/refresh token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign tokens.
    pub jwt_secret: String,
    /// Access token lifetime.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
}

/// Media storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded media is written to.
    #[serde(default = "default_media_path")]
    pub base_path: PathBuf,
    /// Public URL prefix media is served from.
    #[serde(default = "default_media_url")]
    pub base_url: String,
    /// Largest accepted request body for uploads, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl MediaConfig {
    /// Path under which uploaded media is served, taken from `base_url`.
    ///
    /// Accepts absolute URLs (`http://host/media`) and bare paths (`/media`).
    #[must_use]
    pub fn mount_path(&self) -> String {
        let path = match url::Url::parse(&self.base_url) {
            Ok(url) => url.path().to_string(),
            Err(_) => self.base_url.clone(),
        };
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            "/media".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_path: default_media_path(),
            base_url: default_media_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_access_ttl() -> i64 {
    60 * 60 * 24
}

const fn default_refresh_ttl() -> i64 {
    60 * 60 * 24 * 10
}

fn default_media_path() -> PathBuf {
    PathBuf::from("./public/media")
}

fn default_media_url() -> String {
    "/media".to_string()
}

const fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `VIDTUBE_ENV`)
    /// 4. Environment variables with `VIDTUBE__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let env = std::env::var("VIDTUBE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VIDTUBE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("VIDTUBE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vidtube.toml");
        std::fs::write(
            &path,
            r#"
[server]
url = "http://localhost:8000"

[database]
url = "postgres://localhost/vidtube"

[auth]
jwt_secret = "secret"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.max_connections, 100);
        assert_eq!(config.auth.access_token_ttl_secs, 86_400);
        assert_eq!(config.media.base_url, "/media");
        assert_eq!(config.media.max_upload_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_media_mount_path() {
        let mut media = MediaConfig::default();
        assert_eq!(media.mount_path(), "/media");

        media.base_url = "http://localhost:8000/static/media/".to_string();
        assert_eq!(media.mount_path(), "/static/media");

        media.base_url = "https://cdn.example.com".to_string();
        assert_eq!(media.mount_path(), "/media");
    }
}

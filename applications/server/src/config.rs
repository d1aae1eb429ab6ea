/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use soundmark_core::limits;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_lastfm")]
    pub lastfm: LastfmSettings,

    #[serde(default = "default_limits")]
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    #[serde(default = "default_jwt_refresh_expiration_days")]
    pub jwt_refresh_expiration_days: u64,
}

/// Last.fm access settings
///
/// An empty `api_key` is allowed; the Last.fm routes then answer with a
/// configuration error while the rest of the server works normally.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LastfmSettings {
    #[serde(default)]
    pub api_key: String,

    /// Override of the web-service endpoint, used by tests
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Beta capacity caps, overriding the `soundmark_core::limits` defaults
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_albums_per_user")]
    pub max_albums_per_user: i64,

    #[serde(default = "default_max_users")]
    pub max_users: i64,
}

impl ServerConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with SOUNDMARK_)
        settings = settings.add_source(
            config::Environment::with_prefix("SOUNDMARK")
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set SOUNDMARK_AUTH_JWT_SECRET)".to_string(),
            ));
        }

        if self.limits.max_albums_per_user <= 0 || self.limits.max_users <= 0 {
            return Err(ServerError::Config(
                "Capacity limits must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite:data/soundmark.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        jwt_refresh_expiration_days: default_jwt_refresh_expiration_days(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_jwt_refresh_expiration_days() -> u64 {
    30
}

fn default_lastfm() -> LastfmSettings {
    LastfmSettings {
        api_key: String::new(),
        base_url: None,
    }
}

fn default_limits() -> LimitSettings {
    LimitSettings {
        max_albums_per_user: default_max_albums_per_user(),
        max_users: default_max_users(),
    }
}

fn default_max_albums_per_user() -> i64 {
    limits::MAX_ALBUMS_PER_USER
}

fn default_max_users() -> i64 {
    limits::MAX_USERS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            lastfm: default_lastfm(),
            limits: default_limits(),
        }
    }
}

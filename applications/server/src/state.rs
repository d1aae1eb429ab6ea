/// Shared application state
use crate::config::LimitSettings;
use crate::error::{Result, ServerError};
use crate::services::AuthService;
use soundmark_lastfm::LastfmClient;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    /// Absent when no Last.fm API key is configured
    pub lastfm: Option<Arc<LastfmClient>>,
    pub limits: LimitSettings,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        lastfm: Option<Arc<LastfmClient>>,
        limits: LimitSettings,
    ) -> Self {
        Self {
            pool,
            auth_service,
            lastfm,
            limits,
        }
    }

    /// The Last.fm client, or a configuration error when none is set up
    pub fn lastfm(&self) -> Result<&LastfmClient> {
        self.lastfm.as_deref().ok_or_else(|| {
            ServerError::Config(
                "Last.fm API key is not configured (set SOUNDMARK_LASTFM_API_KEY)".to_string(),
            )
        })
    }
}

//! Soundmark Server
//!
//! HTTP API for the Soundmark album tracker: JWT-authenticated library
//! CRUD, spreadsheet import/export, and Last.fm search/merge proxies.
//!
//! This library exposes the router and its components for testing.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::auth::AuthService;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full application router
pub fn create_app(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/signup", post(api::auth::signup))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/limits/users", get(api::limits::user_limits));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Library
        .route(
            "/library",
            get(api::library::list_entries).post(api::library::create_entry),
        )
        .route("/library/import", post(api::transfer::import_entries))
        .route("/library/export", get(api::transfer::export_entries))
        .route(
            "/library/:id",
            get(api::library::get_entry)
                .put(api::library::update_entry)
                .delete(api::library::delete_entry),
        )
        // Merge
        .route("/library/:id/merge/preview", get(api::merge::preview_merge))
        .route("/library/:id/merge", post(api::merge::apply_merge))
        // Limits
        .route("/limits/albums", get(api::limits::album_limits))
        // Last.fm proxies
        .route("/lastfm/search-artist", get(api::lastfm::search_artist))
        .route("/lastfm/search-album", get(api::lastfm::search_album))
        .route("/lastfm/artist-albums", get(api::lastfm::artist_albums))
        .route("/lastfm/album-info", get(api::lastfm::album_info))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

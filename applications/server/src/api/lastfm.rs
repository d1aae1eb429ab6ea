/// Last.fm proxy routes
///
/// Thin pass-throughs over the client so the browser never holds the
/// API key. Search failures surface as upstream errors; only the
/// album-info "nothing known" case maps to 404.
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use soundmark_core::types::AlbumMetadata;
use soundmark_lastfm::{AlbumMatch, ArtistMatch, TopAlbum};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtistParams {
    #[serde(default)]
    pub artist: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumParams {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
}

/// GET /api/lastfm/search-artist?q=
pub async fn search_artist(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ArtistMatch>>> {
    let q = require(&params.q, "q")?;
    let matches = app_state
        .lastfm()?
        .search_artists(q)
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;
    Ok(Json(matches))
}

/// GET /api/lastfm/search-album?q=
pub async fn search_album(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<AlbumMatch>>> {
    let q = require(&params.q, "q")?;
    let matches = app_state
        .lastfm()?
        .search_albums(q)
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;
    Ok(Json(matches))
}

/// GET /api/lastfm/artist-albums?artist=
pub async fn artist_albums(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(params): Query<ArtistParams>,
) -> Result<Json<Vec<TopAlbum>>> {
    let artist = require(&params.artist, "artist")?;
    let albums = app_state
        .lastfm()?
        .artist_top_albums(artist)
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;
    Ok(Json(albums))
}

/// GET /api/lastfm/album-info?artist=&album=
pub async fn album_info(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(params): Query<AlbumParams>,
) -> Result<Json<AlbumMetadata>> {
    let artist = require(&params.artist, "artist")?;
    let album = require(&params.album, "album")?;
    let metadata = app_state
        .lastfm()?
        .fetch_album_metadata(artist, album)
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?
        .ok_or_else(|| ServerError::NotFound("No album data found".to_string()))?;
    Ok(Json(metadata))
}

fn require<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServerError::BadRequest(format!(
            "Missing query parameter: {name}"
        )));
    }
    Ok(trimmed)
}

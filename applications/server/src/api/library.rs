/// Library entry API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use soundmark_core::types::{
    AlbumTrack, CreateEntry, EntryId, LibraryEntry, SimilarArtist, Status,
};
use soundmark_storage::entries::{self, ListOrder, ListQuery};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<LibraryEntry>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub subgenre: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub influence_notes: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub lastfm_url: Option<String>,
    #[serde(default)]
    pub album_wiki: Option<String>,
    #[serde(default)]
    pub tracks: Vec<AlbumTrack>,
    #[serde(default)]
    pub similar_artists: Vec<SimilarArtist>,
}

/// The detail-page save: status, rating, and notes
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub status: Status,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub influence_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/library
pub async fn list_entries(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<ListParams>,
) -> Result<Json<EntriesResponse>> {
    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<Status>()
                .map_err(|_| ServerError::BadRequest(format!("Unknown status: {raw}")))?,
        ),
        None => None,
    };

    let order = match params.order.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => ListOrder::from_param(raw)
            .ok_or_else(|| ServerError::BadRequest(format!("Unknown sort order: {raw}")))?,
        None => ListOrder::default(),
    };

    let query = ListQuery {
        status,
        search: params.q.filter(|q| !q.trim().is_empty()),
        order,
    };

    let entries = entries::list_for_user(&app_state.pool, auth.user_id(), &query).await?;
    let total = entries.len();

    Ok(Json(EntriesResponse { entries, total }))
}

/// POST /api/library
pub async fn create_entry(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Json<LibraryEntry>> {
    let artist = req.artist.trim().to_string();
    let title = req.title.trim().to_string();
    if artist.is_empty() || title.is_empty() {
        return Err(ServerError::BadRequest(
            "Artist and title are required".to_string(),
        ));
    }
    validate_rating(req.rating)?;

    // Soft cap, checked here and by import; storage does not enforce it
    let max_albums = app_state.limits.max_albums_per_user;
    let current = entries::count_for_user(&app_state.pool, auth.user_id()).await?;
    if current >= max_albums {
        return Err(ServerError::Capacity(format!(
            "Album limit reached ({max_albums} max)"
        )));
    }

    let entry = entries::create(
        &app_state.pool,
        CreateEntry {
            user_id: auth.user_id().clone(),
            artist,
            title,
            release_year: req.release_year,
            genre: req.genre,
            subgenre: req.subgenre,
            country: req.country,
            status: req.status,
            rating: req.rating,
            influence_notes: req.influence_notes,
            cover_image_url: req.cover_image_url,
            lastfm_url: req.lastfm_url,
            album_wiki: req.album_wiki,
            tracks: req.tracks,
            similar_artists: req.similar_artists,
        },
    )
    .await?;

    Ok(Json(entry))
}

/// GET /api/library/:id
pub async fn get_entry(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<LibraryEntry>> {
    let entry = entries::get_by_id(&app_state.pool, &EntryId::new(id), auth.user_id())
        .await?
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))?;
    Ok(Json(entry))
}

/// PUT /api/library/:id
pub async fn update_entry(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<LibraryEntry>> {
    validate_rating(req.rating)?;

    let entry = entries::update_review(
        &app_state.pool,
        &EntryId::new(id),
        auth.user_id(),
        req.status,
        req.rating,
        req.influence_notes,
    )
    .await?;

    Ok(Json(entry))
}

/// DELETE /api/library/:id
pub async fn delete_entry(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    entries::delete(&app_state.pool, &EntryId::new(id), auth.user_id()).await?;
    Ok(Json(DeleteResponse { success: true }))
}

fn validate_rating(rating: Option<i32>) -> Result<()> {
    if let Some(value) = rating {
        if !(1..=5).contains(&value) {
            return Err(ServerError::BadRequest(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
    }
    Ok(())
}

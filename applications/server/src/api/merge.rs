/// Last.fm field-merge routes
///
/// The preview fetches metadata and proposes a selection; applying takes
/// the confirmed field names plus the metadata the client previewed and
/// writes exactly those fields.
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
use soundmark_core::types::{AlbumMetadata, EntryId, LibraryEntry};
use soundmark_library::{build_patch, initial_selection, MergeField};
use soundmark_storage::entries;
use std::collections::BTreeSet;

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    /// Artist to look up; defaults to the entry's artist
    #[serde(default)]
    pub artist: Option<String>,
    /// Album to look up; defaults to the entry's title
    #[serde(default)]
    pub album: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MergePreviewResponse {
    pub metadata: AlbumMetadata,
    pub preselected: Vec<MergeField>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyMergeRequest {
    pub metadata: AlbumMetadata,
    pub fields: Vec<String>,
}

/// GET /api/library/:id/merge/preview
pub async fn preview_merge(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<MergePreviewResponse>> {
    let entry = entries::get_by_id(&app_state.pool, &EntryId::new(id), auth.user_id())
        .await?
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))?;

    let artist = params
        .artist
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| entry.artist.clone());
    let album = params
        .album
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| entry.title.clone());

    let metadata = app_state
        .lastfm()?
        .fetch_album_metadata(&artist, &album)
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?
        .ok_or_else(|| ServerError::NotFound("No album data found".to_string()))?;

    let preselected = initial_selection(&entry, &metadata).into_iter().collect();

    Ok(Json(MergePreviewResponse {
        metadata,
        preselected,
    }))
}

/// POST /api/library/:id/merge
pub async fn apply_merge(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<ApplyMergeRequest>,
) -> Result<Json<LibraryEntry>> {
    let mut selected = BTreeSet::new();
    for name in &req.fields {
        let field = MergeField::from_param(name)
            .ok_or_else(|| ServerError::BadRequest(format!("Unknown merge field: {name}")))?;
        selected.insert(field);
    }

    let patch = build_patch(&req.metadata, &selected);
    let entry =
        entries::apply_merge_patch(&app_state.pool, &EntryId::new(id), auth.user_id(), &patch)
            .await?;

    Ok(Json(entry))
}

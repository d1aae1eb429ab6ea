/// Spreadsheet import and export routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use soundmark_core::types::ImportRow;
use soundmark_library::{ImportReport, LibraryImporter};
use soundmark_storage::entries::{self, ListQuery};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub entries: Vec<ImportRow>,
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: Option<String>,
}

/// POST /api/library/import
///
/// Accepts either JSON `{ "entries": [...] }` with pre-mapped rows or a
/// multipart upload with an xlsx `file` part, which is decoded through
/// the sheet codec first. Either way the rows run through the
/// reconciler and the report comes back as-is.
pub async fn import_entries(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<ImportReport>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    let rows: Vec<ImportRow> = if content_type.starts_with("multipart/form-data") {
        let file = read_upload(content_type, body).await?;
        soundmark_sheet::read_import(&file)?
    } else if content_type.starts_with("application/json") {
        let req: ImportRequest = serde_json::from_slice(&body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid import payload: {e}")))?;
        req.entries
    } else {
        return Err(ServerError::BadRequest(
            "Expected application/json or multipart/form-data".to_string(),
        ));
    };

    tracing::info!(rows = rows.len(), "Importing batch for {}", auth.user_id());

    let importer = LibraryImporter::new(
        app_state.pool.clone(),
        app_state.limits.max_albums_per_user,
    );
    let report = importer.import(auth.user_id(), rows).await?;

    Ok(Json(report))
}

/// GET /api/library/export?format=compatible|full
pub async fn export_entries(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse> {
    let format = params.format.as_deref().unwrap_or("compatible");
    let entries =
        entries::list_for_user(&app_state.pool, auth.user_id(), &ListQuery::default()).await?;

    let (bytes, suffix) = match format {
        "compatible" => (soundmark_sheet::write_compatible(&entries)?, ""),
        "full" => (soundmark_sheet::write_full(&entries)?, "-full"),
        other => {
            return Err(ServerError::BadRequest(format!(
                "Unknown export format: {other}"
            )))
        }
    };

    let filename = format!(
        "soundmark-export-{}{}.xlsx",
        chrono::Utc::now().format("%Y-%m-%d"),
        suffix
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

/// Pull the `file` part out of a multipart upload
async fn read_upload(content_type: &str, body: axum::body::Bytes) -> Result<Vec<u8>> {
    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .ok_or_else(|| ServerError::BadRequest("Missing multipart boundary".to_string()))?
        .to_string();

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read upload: {e}")))?;
            return Ok(data.to_vec());
        }
    }

    Err(ServerError::BadRequest(
        "Missing file field in upload".to_string(),
    ))
}

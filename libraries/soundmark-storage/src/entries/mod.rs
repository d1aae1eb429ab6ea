//! Library entry queries
//!
//! One vertical slice owning every query that touches `library_entries`.
//! All reads and writes are scoped by `user_id`; ownership enforcement
//! lives here, not in the callers.

use crate::StorageError;
use soundmark_core::types::{
    AlbumTrack, CreateEntry, EntryId, ExistingEntry, ImportUpdate, LibraryEntry, MergePatch,
    SimilarArtist, Status, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

const ENTRY_COLUMNS: &str = "id, user_id, artist, title, release_year, genre, subgenre, country, \
     status, rating, influence_notes, cover_image_url, lastfm_url, album_wiki, tracks, \
     similar_artists, created_at";

/// Sort order for entry listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    /// Artist A-Z, then title
    Artist,
    /// Title A-Z
    Title,
    /// Genre A-Z, then artist
    Genre,
    /// Newest release first
    ReleaseYear,
    /// Most recently added first
    #[default]
    CreatedAt,
}

impl ListOrder {
    /// Parse a query-string value; unknown values yield None
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "artist" => Some(Self::Artist),
            "title" => Some(Self::Title),
            "genre" => Some(Self::Genre),
            "release_year" => Some(Self::ReleaseYear),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Artist => " ORDER BY artist COLLATE NOCASE, title COLLATE NOCASE",
            Self::Title => " ORDER BY title COLLATE NOCASE",
            Self::Genre => " ORDER BY genre COLLATE NOCASE, artist COLLATE NOCASE",
            Self::ReleaseYear => " ORDER BY release_year DESC",
            Self::CreatedAt => " ORDER BY created_at DESC",
        }
    }
}

/// Filters and ordering for a library listing
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: Option<Status>,
    pub search: Option<String>,
    pub order: ListOrder,
}

/// Create a single entry and return it as stored
pub async fn create(pool: &SqlitePool, entry: CreateEntry) -> Result<LibraryEntry> {
    let id = EntryId::generate();
    let created_at = chrono::Utc::now().to_rfc3339();
    let tracks = json_column(&entry.tracks)?;
    let similar = json_column(&entry.similar_artists)?;

    let sql = format!(
        "INSERT INTO library_entries ({ENTRY_COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    sqlx::query(&sql)
        .bind(id.as_str())
        .bind(entry.user_id.as_str())
        .bind(&entry.artist)
        .bind(&entry.title)
        .bind(entry.release_year)
        .bind(&entry.genre)
        .bind(&entry.subgenre)
        .bind(&entry.country)
        .bind(entry.status.as_str())
        .bind(entry.rating)
        .bind(&entry.influence_notes)
        .bind(&entry.cover_image_url)
        .bind(&entry.lastfm_url)
        .bind(&entry.album_wiki)
        .bind(&tracks)
        .bind(&similar)
        .bind(&created_at)
        .execute(pool)
        .await?;

    get_by_id(pool, &id, &entry.user_id)
        .await?
        .ok_or_else(|| StorageError::Query("Failed to retrieve created entry".to_string()))
}

/// Fetch one entry, owner-scoped
pub async fn get_by_id(
    pool: &SqlitePool,
    id: &EntryId,
    user_id: &UserId,
) -> Result<Option<LibraryEntry>> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM library_entries WHERE id = ? AND user_id = ?");
    let row = sqlx::query(&sql)
        .bind(id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| entry_from_row(&row)))
}

/// List a user's entries with optional status filter, text search, and ordering
///
/// Search is a case-insensitive substring match over artist, title, and
/// genre.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &UserId,
    query: &ListQuery,
) -> Result<Vec<LibraryEntry>> {
    let mut sql = format!("SELECT {ENTRY_COLUMNS} FROM library_entries WHERE user_id = ?");
    if query.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if query.search.is_some() {
        sql.push_str(" AND (artist LIKE ? OR title LIKE ? OR genre LIKE ?)");
    }
    sql.push_str(query.order.sql());

    let mut q = sqlx::query(&sql).bind(user_id.as_str());
    if let Some(status) = query.status {
        q = q.bind(status.as_str());
    }
    if let Some(term) = &query.search {
        let pattern = format!("%{}%", term);
        q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows.iter().map(entry_from_row).collect())
}

/// Number of entries a user currently holds
pub async fn count_for_user(pool: &SqlitePool, user_id: &UserId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library_entries WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// The id/artist/title projection import reconciliation matches against
pub async fn select_existing(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<ExistingEntry>> {
    let rows = sqlx::query("SELECT id, artist, title FROM library_entries WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| ExistingEntry {
            id: row.get("id"),
            artist: row.get("artist"),
            title: row.get("title"),
        })
        .collect())
}

/// Insert a batch of entries in one transaction
///
/// All rows land or none do; a single failure rolls the batch back.
pub async fn insert_batch(pool: &SqlitePool, entries: &[CreateEntry]) -> Result<u64> {
    if entries.is_empty() {
        return Ok(0);
    }

    let sql = format!(
        "INSERT INTO library_entries ({ENTRY_COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );

    let mut tx = pool.begin().await?;
    for entry in entries {
        let id = EntryId::generate();
        let created_at = chrono::Utc::now().to_rfc3339();
        let tracks = json_column(&entry.tracks)?;
        let similar = json_column(&entry.similar_artists)?;

        sqlx::query(&sql)
            .bind(id.as_str())
            .bind(entry.user_id.as_str())
            .bind(&entry.artist)
            .bind(&entry.title)
            .bind(entry.release_year)
            .bind(&entry.genre)
            .bind(&entry.subgenre)
            .bind(&entry.country)
            .bind(entry.status.as_str())
            .bind(entry.rating)
            .bind(&entry.influence_notes)
            .bind(&entry.cover_image_url)
            .bind(&entry.lastfm_url)
            .bind(&entry.album_wiki)
            .bind(&tracks)
            .bind(&similar)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(entries.len() as u64)
}

/// Write the import-mutable metadata fields onto one existing entry
///
/// Touches release_year, genre, subgenre, country, status, and
/// influence_notes; never artist, title, rating, or ownership.
pub async fn update_from_import(
    pool: &SqlitePool,
    user_id: &UserId,
    update: &ImportUpdate,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE library_entries
         SET release_year = ?, genre = ?, subgenre = ?, country = ?, status = ?, influence_notes = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(update.release_year)
    .bind(&update.genre)
    .bind(&update.subgenre)
    .bind(&update.country)
    .bind(update.status.as_str())
    .bind(&update.influence_notes)
    .bind(update.id.as_str())
    .bind(user_id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Library entry", update.id.as_str()));
    }

    Ok(())
}

/// The detail-page save: status, rating, and notes in one write
pub async fn update_review(
    pool: &SqlitePool,
    id: &EntryId,
    user_id: &UserId,
    status: Status,
    rating: Option<i32>,
    influence_notes: Option<String>,
) -> Result<LibraryEntry> {
    let result = sqlx::query(
        "UPDATE library_entries
         SET status = ?, rating = ?, influence_notes = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(status.as_str())
    .bind(rating)
    .bind(&influence_notes)
    .bind(id.as_str())
    .bind(user_id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Library entry", id.as_str()));
    }

    get_by_id(pool, id, user_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Library entry", id.as_str()))
}

/// Apply a merge patch: update exactly the fields present in the patch
///
/// An empty patch performs no write and just returns the entry.
pub async fn apply_merge_patch(
    pool: &SqlitePool,
    id: &EntryId,
    user_id: &UserId,
    patch: &MergePatch,
) -> Result<LibraryEntry> {
    if patch.is_empty() {
        return get_by_id(pool, id, user_id)
            .await?
            .ok_or_else(|| StorageError::not_found("Library entry", id.as_str()));
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE library_entries SET ");
    let mut sets = qb.separated(", ");
    if let Some(value) = &patch.cover_image_url {
        sets.push("cover_image_url = ");
        sets.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.genre {
        sets.push("genre = ");
        sets.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.subgenre {
        sets.push("subgenre = ");
        sets.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.release_year {
        sets.push("release_year = ");
        sets.push_bind_unseparated(*value);
    }
    if let Some(tracks) = &patch.tracks {
        sets.push("tracks = ");
        sets.push_bind_unseparated(serde_json::to_string(tracks)?);
    }
    if let Some(value) = &patch.album_wiki {
        sets.push("album_wiki = ");
        sets.push_bind_unseparated(value.clone());
    }
    if let Some(similar) = &patch.similar_artists {
        sets.push("similar_artists = ");
        sets.push_bind_unseparated(serde_json::to_string(similar)?);
    }
    if let Some(value) = &patch.lastfm_url {
        sets.push("lastfm_url = ");
        sets.push_bind_unseparated(value.clone());
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id.to_string());
    qb.push(" AND user_id = ");
    qb.push_bind(user_id.to_string());

    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Library entry", id.as_str()));
    }

    get_by_id(pool, id, user_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Library entry", id.as_str()))
}

/// Delete one entry, owner-scoped
pub async fn delete(pool: &SqlitePool, id: &EntryId, user_id: &UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM library_entries WHERE id = ? AND user_id = ?")
        .bind(id.as_str())
        .bind(user_id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Library entry", id.as_str()));
    }

    Ok(())
}

fn entry_from_row(row: &SqliteRow) -> LibraryEntry {
    let status: String = row.get("status");
    LibraryEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        artist: row.get("artist"),
        title: row.get("title"),
        release_year: row.get("release_year"),
        genre: row.get("genre"),
        subgenre: row.get("subgenre"),
        country: row.get("country"),
        // Unknown stored values degrade to Queued instead of failing a listing
        status: status.parse().unwrap_or_default(),
        rating: row.get("rating"),
        influence_notes: row.get("influence_notes"),
        cover_image_url: row.get("cover_image_url"),
        lastfm_url: row.get("lastfm_url"),
        album_wiki: row.get("album_wiki"),
        tracks: json_list::<AlbumTrack>(row.get("tracks")),
        similar_artists: json_list::<SimilarArtist>(row.get("similar_artists")),
        created_at: row.get("created_at"),
    }
}

/// NULL for an empty list, JSON text otherwise
fn json_column<T: serde::Serialize>(items: &[T]) -> Result<Option<String>> {
    if items.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(items)?))
    }
}

/// Unreadable or missing JSON degrades to an empty list
fn json_list<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Vec<T> {
    raw.as_deref()
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

//! Library entry types
//!
//! A library entry is one album a user tracks: who made it, how far
//! along the listen is, and whatever metadata has been filled in by
//! hand, by spreadsheet import, or from Last.fm.

use super::ids::{EntryId, UserId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listening status of a library entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Not started yet
    #[default]
    Queued,
    /// Currently listening
    Listening,
    /// Listened through
    Finished,
}

impl Status {
    /// All statuses in display order
    pub const ALL: [Status; 3] = [Status::Queued, Status::Listening, Status::Finished];

    /// The exact string stored and serialized for this status
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Queued => "Queued",
            Status::Listening => "Listening",
            Status::Finished => "Finished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Queued" => Ok(Status::Queued),
            "Listening" => Ok(Status::Listening),
            "Finished" => Ok(Status::Finished),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// One track on an album, as fetched from Last.fm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumTrack {
    /// Track name
    pub name: String,

    /// Track length in seconds; 0 when the source had none
    pub duration_seconds: u32,
}

/// An artist related to an album's artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarArtist {
    /// Artist name
    pub name: String,

    /// Last.fm page URL
    pub url: String,
}

/// One album in a user's library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub artist: String,
    pub title: String,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub country: Option<String>,
    pub status: Status,
    /// 1 to 5 when rated
    pub rating: Option<i32>,
    pub influence_notes: Option<String>,
    pub cover_image_url: Option<String>,
    pub lastfm_url: Option<String>,
    pub album_wiki: Option<String>,
    #[serde(default)]
    pub tracks: Vec<AlbumTrack>,
    #[serde(default)]
    pub similar_artists: Vec<SimilarArtist>,
    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,
}

/// Data for creating a new library entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntry {
    pub user_id: UserId,
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

impl CreateEntry {
    /// Create entry data from an import row, owned by the given user
    pub fn from_import(user_id: UserId, row: ImportRow) -> Self {
        Self {
            user_id,
            artist: row.artist,
            title: row.title,
            release_year: row.release_year,
            genre: row.genre,
            subgenre: row.subgenre,
            country: row.country,
            status: row.status,
            rating: None,
            influence_notes: row.influence_notes,
            cover_image_url: None,
            lastfm_url: None,
            album_wiki: None,
            tracks: Vec::new(),
            similar_artists: Vec::new(),
        }
    }
}

/// One mapped spreadsheet row, before reconciliation
///
/// Carries no identifiers, rating, or enrichment fields; those are never
/// set by an import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
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
    pub influence_notes: Option<String>,
}

impl ImportRow {
    /// A row is importable only when both artist and title survive trimming
    pub fn is_valid(&self) -> bool {
        !self.artist.trim().is_empty() && !self.title.trim().is_empty()
    }

    /// Copy of the row with artist and title trimmed
    pub fn normalized(&self) -> Self {
        Self {
            artist: self.artist.trim().to_string(),
            title: self.title.trim().to_string(),
            ..self.clone()
        }
    }
}

/// The metadata slice an import may write onto an existing entry
///
/// By construction this cannot touch artist, title, rating, or ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportUpdate {
    pub id: EntryId,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub country: Option<String>,
    pub status: Status,
    pub influence_notes: Option<String>,
}

impl ImportUpdate {
    /// Build an update targeting `id` from the metadata of a row
    pub fn from_row(id: EntryId, row: &ImportRow) -> Self {
        Self {
            id,
            release_year: row.release_year,
            genre: row.genre.clone(),
            subgenre: row.subgenre.clone(),
            country: row.country.clone(),
            status: row.status,
            influence_notes: row.influence_notes.clone(),
        }
    }
}

/// The projection import reconciliation matches against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingEntry {
    pub id: EntryId,
    pub artist: String,
    pub title: String,
}

/// A partial write to one entry's mergeable metadata fields
///
/// For the scalar fields the outer `Option` marks the field as part of
/// the patch and the inner value is written verbatim; `Some(None)` clears
/// the stored value. Sequence fields carry the fetched sequence directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePatch {
    pub cover_image_url: Option<Option<String>>,
    pub genre: Option<Option<String>>,
    pub subgenre: Option<Option<String>>,
    pub release_year: Option<Option<i32>>,
    pub tracks: Option<Vec<AlbumTrack>>,
    pub album_wiki: Option<Option<String>>,
    pub similar_artists: Option<Vec<SimilarArtist>>,
    pub lastfm_url: Option<Option<String>>,
}

impl MergePatch {
    /// True when no field is part of the patch
    pub fn is_empty(&self) -> bool {
        self.cover_image_url.is_none()
            && self.genre.is_none()
            && self.subgenre.is_none()
            && self.release_year.is_none()
            && self.tracks.is_none()
            && self.album_wiki.is_none()
            && self.similar_artists.is_none()
            && self.lastfm_url.is_none()
    }
}

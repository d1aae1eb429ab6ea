//! Fetched album metadata
//!
//! The shape Last.fm lookups are mapped into. Field names mirror the
//! mergeable attributes of `LibraryEntry`; the merge selector decides
//! which of them actually land on an entry.

use super::entry::{AlbumTrack, SimilarArtist};
use serde::{Deserialize, Serialize};

/// Album metadata fetched from Last.fm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    /// Album title as reported by the source
    pub title: String,

    /// Artist name as reported by the source
    pub artist: String,

    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub lastfm_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub subgenre: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub album_wiki: Option<String>,
    #[serde(default)]
    pub tracks: Vec<AlbumTrack>,
    #[serde(default)]
    pub similar_artists: Vec<SimilarArtist>,

    /// Listener count, 0 when absent
    #[serde(default)]
    pub listeners: u64,

    /// Play count, 0 when absent
    #[serde(default)]
    pub playcount: u64,
}

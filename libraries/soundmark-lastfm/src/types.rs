//! Mapped search-result types
//!
//! These are the shapes handed to callers; the raw wire envelopes stay
//! private to the client module.

use serde::{Deserialize, Serialize};

/// One artist from `artist.search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistMatch {
    pub name: String,
    /// Listener count, 0 when the service omits it
    pub listeners: u64,
    pub url: String,
    /// Largest available image, if any
    pub image: Option<String>,
}

/// One album from `album.search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMatch {
    pub name: String,
    pub artist: String,
    pub url: String,
    /// Largest available image, if any
    pub image: Option<String>,
}

/// One album from `artist.gettopalbums`
///
/// Albums without a usable name or image are filtered out before this
/// type is built, so `image` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAlbum {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub image: String,
    pub playcount: u64,
}

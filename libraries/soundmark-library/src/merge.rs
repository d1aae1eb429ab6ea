//! Field-merge selection
//!
//! When a user fetches Last.fm metadata for an entry they get a
//! side-by-side view and choose, field by field, what to pull in. The
//! mergeable fields form a closed set ([`MergeField`]); this module
//! computes the default selection and turns a confirmed selection into
//! a [`MergePatch`].
//!
//! The default never proposes overwriting data the user already has: a
//! field is pre-selected only when it is empty locally and the fetch
//! produced a value. The user can still force-select any field, in
//! which case the fetched value lands verbatim, even an empty one.

use serde::{Deserialize, Serialize};
use soundmark_core::types::{AlbumMetadata, LibraryEntry, MergePatch};
use std::collections::BTreeSet;

/// One mergeable entry attribute
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MergeField {
    /// cover_image_url
    Cover,
    /// genre
    Genre,
    /// subgenre
    Subgenre,
    /// release_year
    Year,
    /// tracks
    Tracks,
    /// album_wiki
    Wiki,
    /// similar_artists
    Similar,
    /// lastfm_url
    Url,
}

impl MergeField {
    /// Every mergeable field, in display order
    pub const ALL: [MergeField; 8] = [
        MergeField::Cover,
        MergeField::Genre,
        MergeField::Subgenre,
        MergeField::Year,
        MergeField::Tracks,
        MergeField::Wiki,
        MergeField::Similar,
        MergeField::Url,
    ];

    /// The wire name used in API requests and responses
    pub fn as_str(self) -> &'static str {
        match self {
            MergeField::Cover => "cover",
            MergeField::Genre => "genre",
            MergeField::Subgenre => "subgenre",
            MergeField::Year => "year",
            MergeField::Tracks => "tracks",
            MergeField::Wiki => "wiki",
            MergeField::Similar => "similar",
            MergeField::Url => "url",
        }
    }

    /// Parse a wire name; unknown names yield None
    pub fn from_param(s: &str) -> Option<Self> {
        MergeField::ALL.into_iter().find(|f| f.as_str() == s)
    }

    fn current_is_empty(self, entry: &LibraryEntry) -> bool {
        match self {
            MergeField::Cover => !has_text(&entry.cover_image_url),
            MergeField::Genre => !has_text(&entry.genre),
            MergeField::Subgenre => !has_text(&entry.subgenre),
            MergeField::Year => entry.release_year.is_none(),
            MergeField::Tracks => entry.tracks.is_empty(),
            MergeField::Wiki => !has_text(&entry.album_wiki),
            MergeField::Similar => entry.similar_artists.is_empty(),
            MergeField::Url => !has_text(&entry.lastfm_url),
        }
    }

    fn fetched_is_present(self, fetched: &AlbumMetadata) -> bool {
        match self {
            MergeField::Cover => has_text(&fetched.cover_image_url),
            MergeField::Genre => has_text(&fetched.genre),
            MergeField::Subgenre => has_text(&fetched.subgenre),
            MergeField::Year => fetched.release_year.is_some(),
            MergeField::Tracks => !fetched.tracks.is_empty(),
            MergeField::Wiki => has_text(&fetched.album_wiki),
            MergeField::Similar => !fetched.similar_artists.is_empty(),
            MergeField::Url => has_text(&fetched.lastfm_url),
        }
    }
}

/// The default merge selection for one entry and one fetch result
///
/// Selects exactly the fields that are empty on the entry and present
/// in the fetched metadata.
pub fn initial_selection(
    current: &LibraryEntry,
    fetched: &AlbumMetadata,
) -> BTreeSet<MergeField> {
    MergeField::ALL
        .into_iter()
        .filter(|field| field.current_is_empty(current) && field.fetched_is_present(fetched))
        .collect()
}

/// Build the patch for a confirmed selection
///
/// The patch carries exactly the selected fields with the fetched
/// values verbatim; a selected field whose fetched value is empty
/// clears the stored attribute.
pub fn build_patch(fetched: &AlbumMetadata, selected: &BTreeSet<MergeField>) -> MergePatch {
    let mut patch = MergePatch::default();
    for field in selected {
        match field {
            MergeField::Cover => patch.cover_image_url = Some(fetched.cover_image_url.clone()),
            MergeField::Genre => patch.genre = Some(fetched.genre.clone()),
            MergeField::Subgenre => patch.subgenre = Some(fetched.subgenre.clone()),
            MergeField::Year => patch.release_year = Some(fetched.release_year),
            MergeField::Tracks => patch.tracks = Some(fetched.tracks.clone()),
            MergeField::Wiki => patch.album_wiki = Some(fetched.album_wiki.clone()),
            MergeField::Similar => patch.similar_artists = Some(fetched.similar_artists.clone()),
            MergeField::Url => patch.lastfm_url = Some(fetched.lastfm_url.clone()),
        }
    }
    patch
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

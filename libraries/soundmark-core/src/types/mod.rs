//! Domain types for Soundmark

mod entry;
mod ids;
mod metadata;
mod user;

pub use entry::{
    AlbumTrack, CreateEntry, ExistingEntry, ImportRow, ImportUpdate, LibraryEntry, MergePatch,
    SimilarArtist, Status,
};
pub use ids::{EntryId, UserId};
pub use metadata::AlbumMetadata;
pub use user::User;

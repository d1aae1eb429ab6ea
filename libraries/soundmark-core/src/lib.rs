//! Soundmark Core
//!
//! Domain types and error handling for Soundmark, a personal
//! music-library tracker.
//!
//! This crate provides the building blocks shared by the storage layer,
//! the import pipeline, and the server:
//!
//! - **Domain Types**: `LibraryEntry`, `Status`, `AlbumTrack`, `User`, etc.
//! - **Import Shapes**: `ImportRow`, `ImportUpdate`, `ExistingEntry`
//! - **Merge Shapes**: `AlbumMetadata`, `MergePatch`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use soundmark_core::types::{ImportRow, Status};
//!
//! let row = ImportRow {
//!     artist: "  Björk ".to_string(),
//!     title: "Homogenic".to_string(),
//!     status: Status::Finished,
//!     ..ImportRow::default()
//! };
//!
//! assert!(row.is_valid());
//! assert_eq!(row.normalized().artist, "Björk");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod limits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};

// Export all types
pub use types::{
    AlbumMetadata, AlbumTrack, CreateEntry, EntryId, ExistingEntry, ImportRow, ImportUpdate,
    LibraryEntry, MergePatch, SimilarArtist, Status, User, UserId,
};

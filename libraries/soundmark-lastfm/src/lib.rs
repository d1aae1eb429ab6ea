//! Soundmark Last.fm Client
//!
//! Thin client over the Last.fm web service used to search artists and
//! albums and to fetch album metadata (cover art, tags, wiki text,
//! track listings, similar artists) for merging into library entries.
//!
//! All lookups go through [`LastfmClient`]; responses are mapped into
//! `soundmark_core` shapes before anything else sees them. Requests are
//! spaced out with a small client-side rate limiter.

mod client;
mod error;
mod types;

pub use client::LastfmClient;
pub use error::{LastfmError, Result};
pub use types::{AlbumMatch, ArtistMatch, TopAlbum};

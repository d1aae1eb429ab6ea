//! Soundmark Library Core
//!
//! The two decision engines behind library maintenance:
//!
//! - **Import reconciliation**: classify spreadsheet rows against the
//!   user's existing entries (insert vs. update vs. invalid), enforce
//!   the per-user album cap, then apply the plan to storage and report
//!   the outcome with per-failure granularity.
//! - **Field merging**: given one entry and freshly fetched Last.fm
//!   metadata, pre-select the fields worth pulling in (empty locally,
//!   present remotely) and turn the caller's confirmed selection into a
//!   minimal patch.
//!
//! Both engines are pure except for [`LibraryImporter`], which owns the
//! storage round trips.

mod error;
mod importer;
pub mod merge;
pub mod reconcile;

pub use error::{LibraryError, Result};
pub use importer::{ImportReport, LibraryImporter};
pub use merge::{build_patch, initial_selection, MergeField};
pub use reconcile::{reconcile, CapSlots, ReconcilePlan};

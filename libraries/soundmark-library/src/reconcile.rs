//! Import reconciliation
//!
//! Pure classification of a spreadsheet batch against the user's
//! existing library: which rows become new entries, which update an
//! entry already present, which are unusable, and which fall off the
//! end because the album cap leaves no room. Nothing here touches
//! storage; [`crate::LibraryImporter`] applies the resulting plan.

use soundmark_core::types::{ExistingEntry, ImportRow, ImportUpdate};
use std::collections::HashMap;

/// How much room the cap leaves for new entries
#[derive(Debug, Clone, Copy)]
pub struct CapSlots {
    /// `max_albums` minus the user's current count; may be negative
    pub remaining: i64,
    /// The configured cap, used in user-facing messages
    pub max_albums: i64,
}

impl CapSlots {
    /// Slots left for a user currently holding `current_count` entries
    pub fn new(current_count: i64, max_albums: i64) -> Self {
        Self {
            remaining: max_albums - current_count,
            max_albums,
        }
    }
}

/// The outcome of classifying one import batch
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    /// Rows with no existing match, in input order, already capped
    pub to_insert: Vec<ImportRow>,
    /// Updates targeting existing entries, never capped
    pub to_update: Vec<ImportUpdate>,
    /// Rows dropped for missing artist or title
    pub invalid_rows: usize,
    /// Insert candidates dropped by the cap
    pub skipped_due_to_limit: usize,
    /// Human-readable cap message when anything was skipped
    pub cap_error: Option<String>,
}

/// The key new rows and existing entries are matched on
pub fn dedup_key(artist: &str, title: &str) -> String {
    format!(
        "{}|{}",
        artist.trim().to_lowercase(),
        title.trim().to_lowercase()
    )
}

/// Classify an import batch against the existing library
///
/// Rows keep their input order throughout; when the cap truncates the
/// insert list, the earliest rows win. Duplicate keys within the batch
/// classify independently (two new rows sharing a key both insert).
/// When two *existing* entries share a key, the later one silently
/// wins the mapping; nothing prevents that state and callers should
/// not rely on which entry gets the updates.
pub fn reconcile(rows: Vec<ImportRow>, existing: &[ExistingEntry], slots: CapSlots) -> ReconcilePlan {
    let mut existing_by_key = HashMap::new();
    for entry in existing {
        existing_by_key.insert(dedup_key(&entry.artist, &entry.title), entry.id.clone());
    }

    let mut to_insert = Vec::new();
    let mut to_update = Vec::new();
    let mut invalid_rows = 0;

    for row in rows {
        if !row.is_valid() {
            invalid_rows += 1;
            continue;
        }
        let row = row.normalized();
        match existing_by_key.get(&dedup_key(&row.artist, &row.title)) {
            Some(id) => to_update.push(ImportUpdate::from_row(id.clone(), &row)),
            None => to_insert.push(row),
        }
    }

    let candidates = to_insert.len();
    let allowed = slots.remaining.max(0) as usize;
    let mut skipped_due_to_limit = 0;
    let mut cap_error = None;

    if candidates > allowed {
        skipped_due_to_limit = candidates - allowed;
        to_insert.truncate(allowed);
        cap_error = Some(if slots.remaining <= 0 {
            format!(
                "Album limit reached ({} max). {} new albums skipped.",
                slots.max_albums, skipped_due_to_limit
            )
        } else {
            format!(
                "Album limit approaching. Only {} of {} new albums imported. {} skipped.",
                allowed, candidates, skipped_due_to_limit
            )
        });
    }

    ReconcilePlan {
        to_insert,
        to_update,
        invalid_rows,
        skipped_due_to_limit,
        cap_error,
    }
}

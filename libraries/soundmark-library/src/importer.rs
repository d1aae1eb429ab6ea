//! Import orchestration
//!
//! Runs a reconciled plan against storage and collects the outcome.
//! The batch insert is one unit of work (all rows or none); updates
//! run row by row so one bad row cannot take its siblings down. Every
//! failure lands in the report instead of aborting the import.

use crate::error::Result;
use crate::reconcile::{reconcile, CapSlots};
use serde::{Deserialize, Serialize};
use soundmark_core::types::{CreateEntry, ImportRow, UserId};
use soundmark_storage::entries;
use sqlx::SqlitePool;

/// What an import did, returned to the caller as-is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows inserted as new entries
    pub imported: u64,
    /// Existing entries updated in place
    pub updated: u64,
    /// Human-readable failure and skip messages, in a fixed order
    pub errors: Vec<String>,
    /// Insert candidates dropped by the album cap
    pub skipped_due_to_limit: usize,
}

/// Applies import batches to one user's library
pub struct LibraryImporter {
    pool: SqlitePool,
    max_albums: i64,
}

impl LibraryImporter {
    /// An importer enforcing the given album cap
    pub fn new(pool: SqlitePool, max_albums: i64) -> Self {
        Self { pool, max_albums }
    }

    /// Import a batch of mapped rows into the user's library
    ///
    /// Returns `Err` only when the existing library cannot be read;
    /// write failures are reported inside the `ImportReport`.
    pub async fn import(&self, user_id: &UserId, rows: Vec<ImportRow>) -> Result<ImportReport> {
        let invalid_total = rows.iter().filter(|row| !row.is_valid()).count();

        // A batch with nothing valid never touches storage
        if invalid_total == rows.len() {
            let mut report = ImportReport::default();
            if invalid_total > 0 {
                report
                    .errors
                    .push(format!("{invalid_total} entries missing artist or title"));
            }
            return Ok(report);
        }

        let existing = entries::select_existing(&self.pool, user_id).await?;
        let current = entries::count_for_user(&self.pool, user_id).await?;
        let plan = reconcile(rows, &existing, CapSlots::new(current, self.max_albums));

        tracing::debug!(
            inserts = plan.to_insert.len(),
            updates = plan.to_update.len(),
            invalid = plan.invalid_rows,
            skipped = plan.skipped_due_to_limit,
            "Reconciled import batch"
        );

        let mut report = ImportReport {
            skipped_due_to_limit: plan.skipped_due_to_limit,
            ..ImportReport::default()
        };

        let mut insert_error = None;
        if !plan.to_insert.is_empty() {
            let batch: Vec<CreateEntry> = plan
                .to_insert
                .into_iter()
                .map(|row| CreateEntry::from_import(user_id.clone(), row))
                .collect();

            match entries::insert_batch(&self.pool, &batch).await {
                Ok(count) => report.imported = count,
                Err(err) => {
                    tracing::warn!("Import batch insert failed: {err}");
                    insert_error = Some(format!("Insert error: {err}"));
                }
            }
        }

        for update in &plan.to_update {
            match entries::update_from_import(&self.pool, user_id, update).await {
                Ok(()) => report.updated += 1,
                Err(err) => {
                    tracing::warn!("Import update failed for {}: {err}", update.id);
                    report.errors.push(format!("Update error: {err}"));
                }
            }
        }

        // Fixed ordering: insert failure first, then update failures
        // (already pushed), then the cap message, then the invalid count
        if let Some(message) = insert_error {
            report.errors.insert(0, message);
        }
        if let Some(message) = plan.cap_error {
            report.errors.push(message);
        }
        if plan.invalid_rows > 0 {
            report.errors.push(format!(
                "{} entries skipped (missing artist or title)",
                plan.invalid_rows
            ));
        }

        Ok(report)
    }
}

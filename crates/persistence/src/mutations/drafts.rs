// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{self, DraftRecord, DraftRow, SaveOutcome};
use crate::diesel_schema::form_drafts;
use crate::error::PersistenceError;
use crate::queries::get_draft_version;

/// Stores a draft unless the same writer already stored a newer one.
///
/// A draft from a different writer replaces the stored one whatever its
/// sequence. The check and the write run in one transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `record` - The draft to store
///
/// # Returns
///
/// * `SaveOutcome::Stored` if the row was written
/// * `SaveOutcome::Stale` if the stored draft has the same writer and a sequence
///   greater than or equal to the record's
///
/// # Errors
///
/// Returns an error if the sequence does not fit the column or the write fails.
pub fn upsert_draft(
    conn: &mut SqliteConnection,
    record: &DraftRecord,
) -> Result<SaveOutcome, PersistenceError> {
    let row: DraftRow = DraftRow::from_record(record).ok_or_else(|| {
        PersistenceError::SerializationError(format!(
            "Draft sequence {} exceeds the storable range",
            record.sequence
        ))
    })?;

    conn.transaction::<SaveOutcome, PersistenceError, _>(|conn| {
        let stored: Option<(String, i64)> = get_draft_version(conn, &row.draft_key)?;
        if stored.is_some_and(|(writer, sequence)| {
            !data_models::is_replaced_by(&writer, u64::try_from(sequence).unwrap_or(0), record)
        }) {
            debug!(
                draft_key = %row.draft_key,
                writer = %row.writer,
                sequence = row.sequence,
                "Ignoring stale draft save"
            );
            return Ok(SaveOutcome::Stale);
        }

        diesel::replace_into(form_drafts::table)
            .values(&row)
            .execute(conn)?;

        debug!(
            draft_key = %row.draft_key,
            writer = %row.writer,
            sequence = row.sequence,
            "Draft stored"
        );
        Ok(SaveOutcome::Stored)
    })
}

/// Deletes the draft stored under `draft_key`.
///
/// # Returns
///
/// * `true` if a draft was deleted
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_draft(conn: &mut SqliteConnection, draft_key: &str) -> Result<bool, PersistenceError> {
    let deleted: usize =
        diesel::delete(form_drafts::table.filter(form_drafts::draft_key.eq(draft_key)))
            .execute(conn)?;
    debug!(draft_key, deleted, "Draft discarded");
    Ok(deleted > 0)
}

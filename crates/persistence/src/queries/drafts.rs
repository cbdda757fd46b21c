// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{DraftRecord, DraftRow};
use crate::diesel_schema::form_drafts;
use crate::error::PersistenceError;

/// Retrieves the draft stored under `draft_key`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `draft_key` - The slot key
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no draft is stored.
pub fn get_draft(
    conn: &mut SqliteConnection,
    draft_key: &str,
) -> Result<Option<DraftRecord>, PersistenceError> {
    debug!("Looking up draft: {}", draft_key);

    let row: Option<DraftRow> = form_drafts::table
        .filter(form_drafts::draft_key.eq(draft_key))
        .select(DraftRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(DraftRow::into_record))
}

/// Retrieves only the writer token and sequence stored for `draft_key`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_draft_version(
    conn: &mut SqliteConnection,
    draft_key: &str,
) -> Result<Option<(String, i64)>, PersistenceError> {
    let version: Option<(String, i64)> = form_drafts::table
        .filter(form_drafts::draft_key.eq(draft_key))
        .select((form_drafts::writer, form_drafts::sequence))
        .first(conn)
        .optional()?;
    Ok(version)
}

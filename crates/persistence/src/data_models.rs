// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::diesel_schema::form_drafts;

/// One stored draft, independent of the store holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    /// The fixed slot key for the form kind.
    pub key: String,
    /// The form kind name the payload was encoded from.
    pub form_kind: String,
    /// The serialized form fields.
    pub payload_json: String,
    /// Token of the autosaver that wrote the snapshot.
    pub writer: String,
    /// Monotonic counter within one writer.
    pub sequence: u64,
    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
}

/// Whether a save reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Stored,
    /// The same writer already stored a newer snapshot; this one was dropped.
    Stale,
}

impl DraftRecord {
    /// Whether `incoming` may replace this stored record.
    ///
    /// Snapshots from one writer only move forward. A different writer
    /// always takes over the slot.
    #[must_use]
    pub fn is_replaced_by(&self, incoming: &Self) -> bool {
        is_replaced_by(&self.writer, self.sequence, incoming)
    }
}

pub(crate) fn is_replaced_by(
    stored_writer: &str,
    stored_sequence: u64,
    incoming: &DraftRecord,
) -> bool {
    stored_writer != incoming.writer || stored_sequence < incoming.sequence
}

/// Diesel row for `form_drafts`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = form_drafts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct DraftRow {
    pub draft_key: String,
    pub form_kind: String,
    pub payload_json: String,
    pub writer: String,
    pub sequence: i64,
    pub saved_at: String,
}

impl DraftRow {
    /// Converts a record into a row, rejecting sequences beyond `i64`.
    pub(crate) fn from_record(record: &DraftRecord) -> Option<Self> {
        Some(Self {
            draft_key: record.key.clone(),
            form_kind: record.form_kind.clone(),
            payload_json: record.payload_json.clone(),
            writer: record.writer.clone(),
            sequence: i64::try_from(record.sequence).ok()?,
            saved_at: record.saved_at.clone(),
        })
    }

    /// Converts a row into a record. Negative sequences read as zero.
    pub(crate) fn into_record(self) -> DraftRecord {
        DraftRecord {
            key: self.draft_key,
            form_kind: self.form_kind,
            payload_json: self.payload_json,
            writer: self.writer,
            sequence: u64::try_from(self.sequence).unwrap_or(0),
            saved_at: self.saved_at,
        }
    }
}

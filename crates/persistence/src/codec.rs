// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed encoding of form fields into draft records.

use erp_forms_domain::FormSchema;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::data_models::DraftRecord;
use crate::error::PersistenceError;

/// Serializes form fields into the draft slot for their form kind.
///
/// # Arguments
///
/// * `fields` - The form data to store
/// * `writer` - Token of the autosaver writing the snapshot
/// * `sequence` - The writer's sequence number for this snapshot
/// * `saved_at` - When the snapshot was taken
///
/// # Errors
///
/// Returns an error if the fields or the timestamp cannot be serialized.
pub fn encode_draft<F: FormSchema>(
    fields: &F,
    writer: &str,
    sequence: u64,
    saved_at: OffsetDateTime,
) -> Result<DraftRecord, PersistenceError> {
    let payload_json: String = serde_json::to_string(fields)?;
    let saved_at: String = saved_at
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

    Ok(DraftRecord {
        key: F::KIND.draft_key().to_string(),
        form_kind: F::KIND.name().to_string(),
        payload_json,
        writer: writer.to_string(),
        sequence,
        saved_at,
    })
}

/// Deserializes a stored draft back into form fields.
///
/// # Errors
///
/// Returns an error if:
/// - The record was encoded from a different form kind
/// - The payload is not a valid snapshot of `F`
pub fn decode_draft<F: FormSchema>(record: &DraftRecord) -> Result<F, PersistenceError> {
    if record.form_kind != F::KIND.name() {
        return Err(PersistenceError::FormKindMismatch {
            key: record.key.clone(),
            expected: F::KIND.name().to_string(),
            found: record.form_kind.clone(),
        });
    }
    Ok(serde_json::from_str(&record.payload_json)?)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_requisition;
use crate::{
    DraftRecord, DraftStore, PersistenceError, SqliteDraftStore, decode_draft, encode_draft,
};
use erp_forms_domain::{FormSchema, Invoice, LocalId, PurchaseRequisition, RequisitionCollection};
use time::macros::datetime;

#[test]
fn test_encode_uses_form_slot_and_rfc3339_timestamp() {
    let record: DraftRecord = encode_draft(
        &create_test_requisition(),
        "session-a",
        4,
        datetime!(2026-03-01 10:15:00 UTC),
    )
    .unwrap();

    assert_eq!(record.key, "purchase-requisition-draft");
    assert_eq!(record.form_kind, "purchase-requisition");
    assert_eq!(record.writer, "session-a");
    assert_eq!(record.sequence, 4);
    assert_eq!(record.saved_at, "2026-03-01T10:15:00Z");
}

#[test]
fn test_draft_round_trip_through_sqlite_reproduces_fields() {
    let original: PurchaseRequisition = create_test_requisition();
    let mut store: SqliteDraftStore = SqliteDraftStore::new_in_memory().unwrap();
    store
        .save(
            &encode_draft(&original, "session-a", 1, datetime!(2026-03-01 10:15:00 UTC))
                .unwrap(),
        )
        .unwrap();

    let stored: DraftRecord = store.restore("purchase-requisition-draft").unwrap().unwrap();
    let restored: PurchaseRequisition = decode_draft(&stored).unwrap();

    assert_eq!(restored, original);
}

#[test]
fn test_restored_items_keep_generating_fresh_ids() {
    let original: PurchaseRequisition = create_test_requisition();
    let record: DraftRecord =
        encode_draft(&original, "session-a", 1, datetime!(2026-03-01 10:15:00 UTC)).unwrap();
    let mut restored: PurchaseRequisition = decode_draft(&record).unwrap();

    let next: LocalId = restored.add_item(RequisitionCollection::Items);

    assert_eq!(next.value(), "item-3");
    assert_eq!(restored.items.len(), 3);
}

#[test]
fn test_decode_rejects_other_form_kind() {
    let record: DraftRecord = encode_draft(
        &create_test_requisition(),
        "session-a",
        1,
        datetime!(2026-03-01 10:15:00 UTC),
    )
    .unwrap();

    let result: Result<Invoice, PersistenceError> = decode_draft(&record);

    assert_eq!(
        result.unwrap_err(),
        PersistenceError::FormKindMismatch {
            key: String::from("purchase-requisition-draft"),
            expected: String::from("invoice"),
            found: String::from("purchase-requisition"),
        }
    );
}

#[test]
fn test_decode_rejects_corrupt_payload() {
    let record: DraftRecord = DraftRecord {
        key: String::from("invoice-draft"),
        form_kind: String::from("invoice"),
        payload_json: String::from("{not json"),
        writer: String::from("session-a"),
        sequence: 1,
        saved_at: String::from("2026-03-01T10:15:00Z"),
    };

    let result: Result<Invoice, PersistenceError> = decode_draft(&record);

    assert!(matches!(result, Err(PersistenceError::SerializationError(_))));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod codec_tests;

use erp_forms_domain::{
    FieldValue, FormSchema, LocalId, PurchaseRequisition, RequisitionCollection,
    RequisitionField, RequisitionItemField,
};

use crate::DraftRecord;

pub fn create_test_record(key: &str, sequence: u64) -> DraftRecord {
    create_test_record_from("session-a", key, sequence)
}

pub fn create_test_record_from(writer: &str, key: &str, sequence: u64) -> DraftRecord {
    DraftRecord {
        key: key.to_string(),
        form_kind: String::from("invoice"),
        payload_json: format!(r#"{{"notes":"{writer} snapshot {sequence}"}}"#),
        writer: writer.to_string(),
        sequence,
        saved_at: String::from("2026-03-01T10:00:00Z"),
    }
}

/// A requisition with a few fields and two catalogue-free items filled in.
pub fn create_test_requisition() -> PurchaseRequisition {
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    form.set_field(RequisitionField::Department, FieldValue::text("Kitchen"))
        .unwrap();
    form.set_field(
        RequisitionField::RequestedByEmail,
        FieldValue::text("chef@example.com"),
    )
    .unwrap();
    form.set_field(RequisitionField::BudgetAvailable, FieldValue::Number(5000.0))
        .unwrap();
    for (name, price) in [("Stock pot", 120.5), ("Ladle", 15.0)] {
        let id: LocalId = form.add_item(RequisitionCollection::Items);
        form.update_item(
            RequisitionCollection::Items,
            &id,
            RequisitionItemField::ItemName,
            FieldValue::text(name),
        )
        .unwrap();
        form.update_item(
            RequisitionCollection::Items,
            &id,
            RequisitionItemField::EstimatedPrice,
            FieldValue::Number(price),
        )
        .unwrap();
    }
    form
}

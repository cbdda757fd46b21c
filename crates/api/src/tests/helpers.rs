// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Arc;
use std::time::Duration;

use erp_forms_audit::{Actor, Cause};
use erp_forms_domain::{Customer, FieldValue, FormKind, Invoice, ReferenceData};
use erp_forms_persistence::{MemoryDraftStore, SharedDraftStore};
use tokio::sync::Mutex;

use crate::{CommandRequest, FormPage, MockSubmitter, OutcomeView, PageConfig};

pub const SUBMIT_DELAY: Duration = Duration::from_millis(1500);
pub const DEBOUNCE: Duration = Duration::from_millis(2000);

pub type TestPage = FormPage<Invoice, MockSubmitter>;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("clerk-123"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("evt-456"), String::from("Form input"))
}

pub fn create_test_reference() -> ReferenceData {
    ReferenceData {
        customers: vec![Customer {
            id: String::from("C-001"),
            name: String::from("Hotel Grand"),
            gstin: String::from("27AAACH1234F1Z5"),
            billing_state: String::from("Maharashtra"),
            shipping_state: String::from("Karnataka"),
        }],
        seller_state: String::from("Maharashtra"),
        ..ReferenceData::default()
    }
}

pub fn create_test_store() -> (Arc<Mutex<MemoryDraftStore>>, SharedDraftStore) {
    let memory: Arc<Mutex<MemoryDraftStore>> = Arc::new(Mutex::new(MemoryDraftStore::new()));
    let shared: SharedDraftStore = memory.clone();
    (memory, shared)
}

pub async fn open_test_page(store: SharedDraftStore, submitter: MockSubmitter) -> TestPage {
    open_test_page_with(store, submitter, PageConfig::for_kind(FormKind::Invoice)).await
}

pub async fn open_test_page_with(
    store: SharedDraftStore,
    submitter: MockSubmitter,
    config: PageConfig,
) -> TestPage {
    FormPage::open(
        create_test_reference(),
        store,
        submitter,
        config,
        create_test_actor(),
    )
    .await
}

pub fn set_field(field: &str, value: FieldValue) -> CommandRequest {
    CommandRequest::SetField {
        field: field.to_string(),
        value,
    }
}

pub fn update_line(field: &str, value: FieldValue) -> CommandRequest {
    CommandRequest::UpdateItem {
        collection: String::from("lineItems"),
        id: String::from("line-1"),
        field: field.to_string(),
        value,
    }
}

/// Inputs that satisfy every invoice rule.
pub fn complete_invoice_requests() -> Vec<CommandRequest> {
    vec![
        set_field("customer", FieldValue::text("Hotel Grand")),
        set_field("invoiceDate", FieldValue::text("2026-03-01")),
        set_field("dueDate", FieldValue::text("2026-03-31")),
        update_line("item", FieldValue::text("Combi oven")),
        update_line("unitPrice", FieldValue::Number(100.0)),
        set_field("billingAddress.street", FieldValue::text("1 Marine Drive")),
        set_field("billingAddress.city", FieldValue::text("Mumbai")),
        set_field("termsAccepted", FieldValue::Flag(true)),
    ]
}

/// Fills a complete invoice and advances to the review step.
pub fn fill_and_advance(page: &mut TestPage) {
    for request in complete_invoice_requests() {
        page.dispatch(request, create_test_cause()).unwrap();
    }
    for step in 0..3 {
        let outcome: OutcomeView = page
            .dispatch(CommandRequest::Advance, create_test_cause())
            .unwrap();
        assert_eq!(
            outcome,
            OutcomeView::StepChanged {
                from: step,
                to: step + 1
            }
        );
    }
    assert!(page.session().is_final_step());
}

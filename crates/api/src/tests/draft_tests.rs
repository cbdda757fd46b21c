// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use erp_forms_domain::{FieldValue, FormSchema, Invoice, InvoiceField};
use erp_forms_persistence::{
    DraftRecord, DraftStore, MemoryDraftStore, decode_draft, encode_draft,
};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::helpers::{
    DEBOUNCE, SUBMIT_DELAY, create_test_cause, create_test_store, open_test_page, set_field,
};
use crate::{ApiError, MockSubmitter, SessionView};

async fn store_saved_draft(memory: &Arc<Mutex<MemoryDraftStore>>, notes: &str, sequence: u64) {
    let mut invoice: Invoice = Invoice::default();
    invoice
        .set_field(InvoiceField::Notes, FieldValue::text(notes))
        .unwrap();
    let record: DraftRecord = encode_draft(
        &invoice,
        "earlier-session",
        sequence,
        OffsetDateTime::now_utc(),
    )
    .unwrap();
    memory.lock().await.save(&record).unwrap();
}

async fn stored_notes(memory: &Arc<Mutex<MemoryDraftStore>>) -> Option<String> {
    memory
        .lock()
        .await
        .get("invoice-draft")
        .map(|record| decode_draft::<Invoice>(record).unwrap().notes)
}

async fn stored_sequence(memory: &Arc<Mutex<MemoryDraftStore>>) -> Option<u64> {
    memory
        .lock()
        .await
        .get("invoice-draft")
        .map(|record| record.sequence)
}

#[tokio::test(start_paused = true)]
async fn test_existing_draft_is_offered() {
    let (memory, shared) = create_test_store();
    store_saved_draft(&memory, "saved", 5).await;

    let page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    assert!(page.has_draft_offer());
    let view: SessionView = page.view().unwrap();
    assert!(view.draft_offer.is_some());
    assert!(page.session().fields().notes.is_empty());
    assert_eq!(page.draft_sequence(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_pending_offer_suspends_autosave() {
    let (memory, shared) = create_test_store();
    store_saved_draft(&memory, "saved", 5).await;
    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    page.dispatch(set_field("notes", FieldValue::text("new")), create_test_cause())
        .unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(page.draft_sequence(), 5);
    assert_eq!(stored_sequence(&memory).await, Some(5));
}

#[tokio::test(start_paused = true)]
async fn test_restore_draft_replaces_fields_and_resumes_autosave() {
    let (memory, shared) = create_test_store();
    store_saved_draft(&memory, "saved", 5).await;
    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    page.restore_draft(create_test_cause()).unwrap();

    assert!(!page.has_draft_offer());
    assert_eq!(page.session().fields().notes, "saved");
    assert_eq!(page.session().current_step(), 0);
    assert_eq!(
        page.journal().last().unwrap().action.name,
        "RestoreDraft"
    );

    page.dispatch(set_field("notes", FieldValue::text("saved, edited")), create_test_cause())
        .unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(stored_sequence(&memory).await, Some(6));
}

#[tokio::test(start_paused = true)]
async fn test_discard_draft_deletes_it() {
    let (memory, shared) = create_test_store();
    store_saved_draft(&memory, "saved", 5).await;
    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    page.discard_draft().await.unwrap();

    assert!(!page.has_draft_offer());
    assert_eq!(stored_sequence(&memory).await, None);
    assert!(page.session().fields().notes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_edits_made_during_offer_are_saved_after_discard() {
    let (memory, shared) = create_test_store();
    store_saved_draft(&memory, "saved", 5).await;
    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;
    page.dispatch(set_field("notes", FieldValue::text("fresh")), create_test_cause())
        .unwrap();

    page.discard_draft().await.unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(stored_sequence(&memory).await, Some(6));
}

#[tokio::test(start_paused = true)]
async fn test_restore_without_offer_is_not_found() {
    let (_memory, shared) = create_test_store();
    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    let err: ApiError = page.restore_draft(create_test_cause()).unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
    assert!(page.journal().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unreadable_draft_is_not_offered() {
    let (memory, shared) = create_test_store();
    memory
        .lock()
        .await
        .save(&DraftRecord {
            key: String::from("invoice-draft"),
            form_kind: String::from("invoice"),
            payload_json: String::from("{not json"),
            writer: String::from("earlier-session"),
            sequence: 3,
            saved_at: String::from("2026-01-05T10:00:00Z"),
        })
        .unwrap();

    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;
    assert!(!page.has_draft_offer());

    page.dispatch(set_field("notes", FieldValue::text("over it")), create_test_cause())
        .unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(stored_sequence(&memory).await, Some(4));
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_store_opens_blank_page() {
    let (memory, shared) = create_test_store();
    store_saved_draft(&memory, "saved", 5).await;
    memory.lock().await.set_unavailable(true);

    let mut page = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    assert!(!page.has_draft_offer());
    page.dispatch(set_field("notes", FieldValue::text("still editing")), create_test_cause())
        .unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(page.session().fields().notes, "still editing");
}

#[tokio::test(start_paused = true)]
async fn test_second_page_of_same_kind_overwrites_draft() {
    let (memory, shared) = create_test_store();
    let mut first = open_test_page(shared.clone(), MockSubmitter::new(SUBMIT_DELAY)).await;
    let mut second = open_test_page(shared, MockSubmitter::new(SUBMIT_DELAY)).await;

    for notes in ["f", "fi", "fir", "firs", "first"] {
        first
            .dispatch(set_field("notes", FieldValue::text(notes)), create_test_cause())
            .unwrap();
    }
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(stored_notes(&memory).await.as_deref(), Some("first"));

    second
        .dispatch(set_field("notes", FieldValue::text("second")), create_test_cause())
        .unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(stored_notes(&memory).await.as_deref(), Some("second"));

    second.close().await;
    first.close().await;
    assert_eq!(stored_notes(&memory).await.as_deref(), Some("second"));
}

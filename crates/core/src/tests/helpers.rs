// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, FormSession, TransitionResult, apply};
use erp_forms_audit::{Actor, Cause};
use erp_forms_domain::{
    Customer, FieldValue, FormSchema, Invoice, InvoiceCollection, InvoiceField, InvoiceLineField,
    LocalId, ReferenceData,
};

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

/// Applies a command that is expected to succeed.
pub fn run<F: FormSchema>(
    reference: &ReferenceData,
    session: &FormSession<F>,
    command: Command<F>,
) -> TransitionResult<F> {
    apply(
        reference,
        session,
        command,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("command should apply")
}

pub fn set(field: InvoiceField, value: FieldValue) -> Command<Invoice> {
    Command::SetField { field, value }
}

pub fn first_line(session: &FormSession<Invoice>) -> LocalId {
    session.fields().line_items.as_slice()[0].id.clone()
}

/// Builds an invoice session with every rule satisfied, still on step one.
pub fn create_test_complete_invoice(reference: &ReferenceData) -> FormSession<Invoice> {
    let mut session: FormSession<Invoice> = FormSession::new(reference);
    let line: LocalId = first_line(&session);
    let commands: Vec<Command<Invoice>> = vec![
        set(InvoiceField::Customer, FieldValue::text("Hotel Grand")),
        set(InvoiceField::InvoiceDate, FieldValue::text("2026-03-01")),
        set(InvoiceField::DueDate, FieldValue::text("2026-03-31")),
        Command::UpdateItem {
            collection: InvoiceCollection::LineItems,
            id: line.clone(),
            field: InvoiceLineField::Item,
            value: FieldValue::text("Combi oven"),
        },
        Command::UpdateItem {
            collection: InvoiceCollection::LineItems,
            id: line,
            field: InvoiceLineField::UnitPrice,
            value: FieldValue::Number(100.0),
        },
        set(InvoiceField::BillingStreet, FieldValue::text("1 Marine Drive")),
        set(InvoiceField::BillingCity, FieldValue::text("Mumbai")),
        set(InvoiceField::TermsAccepted, FieldValue::Flag(true)),
    ];
    for command in commands {
        session = run(reference, &session, command).new_session;
    }
    session
}

/// Advances until the final step, asserting every step passes.
pub fn advance_to_end(
    reference: &ReferenceData,
    mut session: FormSession<Invoice>,
) -> FormSession<Invoice> {
    while !session.is_final_step() {
        session = run(reference, &session, Command::Advance).new_session;
        assert!(session.errors().is_empty());
    }
    session
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    advance_to_end, create_test_actor, create_test_cause, create_test_complete_invoice,
    create_test_reference, run, set,
};
use crate::{Command, CoreError, FormSession, TransitionOutcome, TransitionResult, apply};
use erp_forms_domain::{FieldValue, Invoice, InvoiceField, ReferenceData};

#[test]
fn test_advance_blocked_records_exactly_the_failing_fields() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> = FormSession::new(&reference);

    let result: TransitionResult<Invoice> = run(&reference, &session, Command::Advance);

    assert_eq!(result.outcome, TransitionOutcome::AdvanceBlocked);
    assert_eq!(result.new_session.current_step(), 0);
    let keys: Vec<&str> = result.new_session.errors().keys().collect();
    assert_eq!(keys, vec!["customer", "dueDate"]);
    assert_eq!(
        result.audit_event.after.data,
        "step=1/4 errors=2 completion=0%"
    );
}

#[test]
fn test_advance_validates_only_the_current_step() {
    let reference: ReferenceData = create_test_reference();
    let complete: FormSession<Invoice> = create_test_complete_invoice(&reference);
    // Billing address is checked on step three, not step one.
    let partial: FormSession<Invoice> = run(
        &reference,
        &complete,
        set(InvoiceField::BillingStreet, FieldValue::text("")),
    )
    .new_session;

    let result: TransitionResult<Invoice> = run(&reference, &partial, Command::Advance);

    assert_eq!(
        result.outcome,
        TransitionOutcome::StepChanged { from: 0, to: 1 }
    );
    assert!(result.new_session.errors().is_empty());
}

#[test]
fn test_advance_through_every_step() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> =
        advance_to_end(&reference, create_test_complete_invoice(&reference));

    assert_eq!(session.current_step(), 3);
    assert!(session.is_final_step());
}

#[test]
fn test_advance_on_final_step_is_rejected() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> =
        advance_to_end(&reference, create_test_complete_invoice(&reference));

    let result: Result<TransitionResult<Invoice>, CoreError> = apply(
        &reference,
        &session,
        Command::Advance,
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(result.unwrap_err(), CoreError::AtFinalStep { step_count: 4 });
}

#[test]
fn test_retreat_clamps_at_first_step() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> = FormSession::new(&reference);

    let result: TransitionResult<Invoice> = run(&reference, &session, Command::Retreat);

    assert_eq!(result.new_session.current_step(), 0);
    assert_eq!(
        result.outcome,
        TransitionOutcome::StepChanged { from: 0, to: 0 }
    );
}

#[test]
fn test_retreat_keeps_entered_data() {
    let reference: ReferenceData = create_test_reference();
    let complete: FormSession<Invoice> = create_test_complete_invoice(&reference);
    let second: FormSession<Invoice> = run(&reference, &complete, Command::Advance).new_session;

    let back: FormSession<Invoice> = run(&reference, &second, Command::Retreat).new_session;

    assert_eq!(back.current_step(), 0);
    assert_eq!(back.fields(), complete.fields());
}

#[test]
fn test_jump_back_to_reached_step() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> =
        advance_to_end(&reference, create_test_complete_invoice(&reference));

    let result: TransitionResult<Invoice> =
        run(&reference, &session, Command::JumpTo { index: 1 });

    assert_eq!(result.new_session.current_step(), 1);
    assert_eq!(result.audit_event.action.details.as_deref(), Some("step=2"));
}

#[test]
fn test_jump_ahead_is_rejected() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> = FormSession::new(&reference);

    let result: Result<TransitionResult<Invoice>, CoreError> = apply(
        &reference,
        &session,
        Command::JumpTo { index: 2 },
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::StepNotReached {
            requested: 2,
            current: 0
        }
    );
}

#[test]
fn test_validate_step_records_errors_without_moving() {
    let reference: ReferenceData = create_test_reference();
    let session: FormSession<Invoice> = FormSession::new(&reference);

    let result: TransitionResult<Invoice> = run(&reference, &session, Command::ValidateStep);

    assert_eq!(result.outcome, TransitionOutcome::Applied);
    assert_eq!(result.new_session.current_step(), 0);
    assert_eq!(result.new_session.errors().len(), 2);
}

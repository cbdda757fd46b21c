// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{FormSession, TransitionOutcome, TransitionResult};
use erp_forms_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use erp_forms_domain::{FieldKey, FormSchema, Keyed, LocalId, ReferenceData, ValidationErrors};

/// Applies a command to the current session, producing a new session and audit event.
///
/// Editing a field or collection clears any error recorded against it.
/// Advancing validates only the current step; when it fails the session
/// stays on the step and its errors are replaced by the failing fields.
///
/// # Arguments
///
/// * `reference` - Lookup tables for operations, rules and derived values
/// * `session` - The current session (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new session, the audit event and the outcome
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A value cannot be converted to the field's type
/// - A sub-record id does not exist, or the last required item would be removed
/// - A reference lookup in an operation fails
/// - Advance is requested on the final step
/// - A jump targets a step that has not been reached
pub fn apply<F: FormSchema>(
    reference: &ReferenceData,
    session: &FormSession<F>,
    command: Command<F>,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult<F>, CoreError> {
    let action: Action = Action::new(command.name().to_string(), command.details());
    let before: StateSnapshot = session.to_snapshot();
    let current: usize = session.current_step();

    let (new_session, outcome): (FormSession<F>, TransitionOutcome) = match command {
        Command::SetField { field, value } => {
            let mut fields: F = session.fields().clone();
            fields.set_field(field, value)?;
            let errors: ValidationErrors = cleared(session.errors(), &[field.key()]);
            (
                session.with(fields, current, errors, reference),
                TransitionOutcome::Applied,
            )
        }
        Command::AddItem { collection } => {
            let mut fields: F = session.fields().clone();
            let id: LocalId = fields.add_item(collection);
            let errors: ValidationErrors = cleared(session.errors(), &[collection.key()]);
            (
                session.with(fields, current, errors, reference),
                TransitionOutcome::ItemAdded(id),
            )
        }
        Command::UpdateItem {
            collection,
            id,
            field,
            value,
        } => {
            let mut fields: F = session.fields().clone();
            fields.update_item(collection, &id, field, value)?;
            let errors: ValidationErrors = cleared(session.errors(), &[collection.key()]);
            (
                session.with(fields, current, errors, reference),
                TransitionOutcome::Applied,
            )
        }
        Command::RemoveItem { collection, id } => {
            let mut fields: F = session.fields().clone();
            fields.remove_item(collection, &id)?;
            let errors: ValidationErrors = cleared(session.errors(), &[collection.key()]);
            (
                session.with(fields, current, errors, reference),
                TransitionOutcome::Applied,
            )
        }
        Command::Operation(operation) => {
            let mut fields: F = session.fields().clone();
            let touched: Vec<FieldKey> = fields.apply_operation(&operation, reference)?;
            let errors: ValidationErrors = cleared(session.errors(), &touched);
            (
                session.with(fields, current, errors, reference),
                TransitionOutcome::Applied,
            )
        }
        Command::Advance => {
            if session.is_final_step() {
                return Err(CoreError::AtFinalStep {
                    step_count: F::step_count(),
                });
            }
            let failing: ValidationErrors = session.fields().validate_step(current, reference);
            if failing.is_empty() {
                (
                    session.with(
                        session.fields().clone(),
                        current + 1,
                        ValidationErrors::new(),
                        reference,
                    ),
                    TransitionOutcome::StepChanged {
                        from: current,
                        to: current + 1,
                    },
                )
            } else {
                (
                    session.with(session.fields().clone(), current, failing, reference),
                    TransitionOutcome::AdvanceBlocked,
                )
            }
        }
        Command::Retreat => {
            let target: usize = current.saturating_sub(1);
            (
                session.with(
                    session.fields().clone(),
                    target,
                    session.errors().clone(),
                    reference,
                ),
                TransitionOutcome::StepChanged {
                    from: current,
                    to: target,
                },
            )
        }
        Command::JumpTo { index } => {
            if index > current {
                return Err(CoreError::StepNotReached {
                    requested: index,
                    current,
                });
            }
            (
                session.with(
                    session.fields().clone(),
                    index,
                    session.errors().clone(),
                    reference,
                ),
                TransitionOutcome::StepChanged {
                    from: current,
                    to: index,
                },
            )
        }
        Command::ValidateStep => {
            let failing: ValidationErrors = session.fields().validate_step(current, reference);
            (
                session.with(session.fields().clone(), current, failing, reference),
                TransitionOutcome::Applied,
            )
        }
        Command::RestoreDraft { fields } => (
            session.with(fields, 0, ValidationErrors::new(), reference),
            TransitionOutcome::StepChanged { from: current, to: 0 },
        ),
    };

    let after: StateSnapshot = new_session.to_snapshot();
    let audit_event: AuditEvent = AuditEvent::new(F::KIND, actor, cause, action, before, after);

    Ok(TransitionResult {
        new_session,
        audit_event,
        outcome,
    })
}

/// Copies `errors` without the entries for `keys`.
fn cleared(errors: &ValidationErrors, keys: &[FieldKey]) -> ValidationErrors {
    let mut remaining: ValidationErrors = errors.clone();
    for key in keys {
        remaining.remove(key);
    }
    remaining
}

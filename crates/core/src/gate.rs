// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only checks deciding whether a session may be submitted.

use crate::error::CoreError;
use crate::state::FormSession;
use erp_forms_domain::{FormSchema, ReferenceData, ValidationErrors};

/// Whether the submit control is enabled.
///
/// True only when the session is on the final step, the final step's
/// rules pass and the acknowledgement flag is set.
#[must_use]
pub fn can_submit<F: FormSchema>(session: &FormSession<F>, reference: &ReferenceData) -> bool {
    prepare_submission(session, reference).is_ok()
}

/// Checks the submission gate and returns the payload to submit.
///
/// This does not create audit events and does not change the session.
///
/// # Arguments
///
/// * `session` - The session to check
/// * `reference` - Lookup tables used by the final step's rules
///
/// # Returns
///
/// * `Ok(F)` a copy of the form data to hand to the submitter
///
/// # Errors
///
/// Returns an error if:
/// - The session is not on the final step
/// - The final step's rules fail
/// - The acknowledgement flag is not set
pub fn prepare_submission<F: FormSchema>(
    session: &FormSession<F>,
    reference: &ReferenceData,
) -> Result<F, CoreError> {
    if !session.is_final_step() {
        return Err(CoreError::NotOnFinalStep {
            current: session.current_step(),
            step_count: F::step_count(),
        });
    }

    let failing: ValidationErrors = session
        .fields()
        .validate_step(session.current_step(), reference);
    if !failing.is_empty() {
        return Err(CoreError::SubmissionBlocked(failing));
    }

    if !session.fields().acknowledged() {
        return Err(CoreError::NotAcknowledged);
    }

    Ok(session.fields().clone())
}

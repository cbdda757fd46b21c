// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use erp_forms_audit::{AuditEvent, StateSnapshot};
use erp_forms_domain::{FormSchema, LocalId, ReferenceData, StepDefinition, ValidationErrors};

/// One in-progress authoring session of a single form.
///
/// The session is only changed through `apply`, which returns a new
/// session. Derived values are recomputed on every transition and are
/// never written directly.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession<F: FormSchema> {
    fields: F,
    current_step: usize,
    errors: ValidationErrors,
    derived: F::Derived,
    /// The blank form this session started from; used for dirty tracking.
    baseline: F,
}

impl<F: FormSchema> FormSession<F> {
    /// Creates a session on step one with the form's blank defaults.
    ///
    /// # Arguments
    ///
    /// * `reference` - Lookup tables used for the blank form and derived values
    #[must_use]
    pub fn new(reference: &ReferenceData) -> Self {
        let fields: F = F::blank(reference);
        let derived: F::Derived = fields.derive(reference);
        Self {
            baseline: fields.clone(),
            fields,
            current_step: 0,
            errors: ValidationErrors::new(),
            derived,
        }
    }

    /// Builds the successor session after a transition.
    pub(crate) fn with(
        &self,
        fields: F,
        current_step: usize,
        errors: ValidationErrors,
        reference: &ReferenceData,
    ) -> Self {
        let derived: F::Derived = fields.derive(reference);
        Self {
            fields,
            current_step,
            errors,
            derived,
            baseline: self.baseline.clone(),
        }
    }

    #[must_use]
    pub const fn fields(&self) -> &F {
        &self.fields
    }

    /// Zero-based index of the visible step.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn current_step_definition(&self) -> Option<&'static StepDefinition<F::Step>> {
        F::steps().get(self.current_step)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        F::step_count()
    }

    #[must_use]
    pub fn is_final_step(&self) -> bool {
        self.current_step + 1 == F::step_count()
    }

    /// Errors from the last validation attempt, minus fields edited since.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub const fn derived(&self) -> &F::Derived {
        &self.derived
    }

    #[must_use]
    pub fn completion(&self) -> u8 {
        self.fields.completion()
    }

    /// Whether the form data differs from the blank form.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.fields != self.baseline
    }

    /// Creates a snapshot of the session for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::describe(
            self.current_step,
            F::step_count(),
            self.errors.len(),
            self.completion(),
        )
    }
}

/// What a transition did, beyond the new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Data changed; the step did not.
    Applied,
    /// A sub-record was appended with this id.
    ItemAdded(LocalId),
    /// The visible step moved.
    StepChanged { from: usize, to: usize },
    /// Advance was refused; the failing fields are in the session's errors.
    AdvanceBlocked,
}

/// The result of applying a command to a session.
#[derive(Debug, Clone)]
pub struct TransitionResult<F: FormSchema> {
    /// The new session after the transition.
    pub new_session: FormSession<F>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    pub outcome: TransitionOutcome,
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The page controller: one form session with its draft and submission plumbing.

use erp_forms::{
    Command, CoreError, FormSession, TransitionOutcome, TransitionResult, apply,
    prepare_submission,
};
use erp_forms_audit::{Actor, AuditEvent, Cause};
use erp_forms_domain::{FormSchema, ReferenceData};
use erp_forms_persistence::{
    DraftAutosaver, DraftRecord, PersistenceError, SharedDraftStore, decode_draft,
};
use tracing::{debug, info, warn};

use crate::config::PageConfig;
use crate::error::{ApiError, translate_core_error};
use crate::request_response::{
    CancelOutcome, CommandRequest, DraftOfferView, Notice, OutcomeView, PageStatus, SessionView,
};
use crate::submit::{SubmissionError, SubmissionReceipt, Submitter};

/// A stored draft found when the page opened.
#[derive(Debug, Clone)]
struct PendingDraft<F> {
    fields: F,
    saved_at: String,
}

/// Drives one form session for one user.
///
/// Every input goes through `apply`, so each change yields one audit event
/// kept in the page journal. Edits schedule a debounced draft save; a
/// successful submission deletes the draft and ends the page.
pub struct FormPage<F: FormSchema, S: Submitter<F>> {
    reference: ReferenceData,
    session: FormSession<F>,
    autosaver: DraftAutosaver<F>,
    submitter: S,
    config: PageConfig,
    actor: Actor,
    journal: Vec<AuditEvent>,
    draft_offer: Option<PendingDraft<F>>,
    status: PageStatus,
    notices: Vec<Notice>,
}

impl<F: FormSchema, S: Submitter<F>> FormPage<F, S> {
    /// Opens a blank session and looks for a stored draft.
    ///
    /// A readable draft becomes a pending offer; autosave stays suspended
    /// until the user restores or discards it. Storage failures are logged
    /// and the page opens without an offer.
    ///
    /// # Arguments
    ///
    /// * `reference` - Lookup tables for the session
    /// * `store` - Where drafts live
    /// * `submitter` - Receives the finished record
    /// * `config` - Debounce, timeout and autosave settings
    /// * `actor` - Who is filling the form
    pub async fn open(
        reference: ReferenceData,
        store: SharedDraftStore,
        submitter: S,
        config: PageConfig,
        actor: Actor,
    ) -> Self {
        let stored: Option<DraftRecord> = if config.autosave {
            load_draft(&store, F::KIND.draft_key()).await
        } else {
            None
        };
        let last_sequence: u64 = stored.as_ref().map_or(0, |record| record.sequence);

        let draft_offer: Option<PendingDraft<F>> =
            stored.and_then(|record| match decode_draft::<F>(&record) {
                Ok(fields) => Some(PendingDraft {
                    fields,
                    saved_at: record.saved_at,
                }),
                Err(e) => {
                    warn!(form = %F::KIND, error = %e, "Stored draft is unreadable; ignoring it");
                    None
                }
            });

        let autosaver: DraftAutosaver<F> =
            DraftAutosaver::spawn(store, config.debounce, last_sequence);
        let session: FormSession<F> = FormSession::new(&reference);

        info!(
            form = %F::KIND,
            actor = %actor.id,
            draft_offered = draft_offer.is_some(),
            "Form page opened"
        );

        Self {
            reference,
            session,
            autosaver,
            submitter,
            config,
            actor,
            journal: Vec::new(),
            draft_offer,
            status: PageStatus::Editing,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &FormSession<F> {
        &self.session
    }

    #[must_use]
    pub const fn status(&self) -> &PageStatus {
        &self.status
    }

    /// Every audit event produced since the page opened, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[AuditEvent] {
        &self.journal
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    #[must_use]
    pub const fn has_draft_offer(&self) -> bool {
        self.draft_offer.is_some()
    }

    /// The sequence number of the latest scheduled draft snapshot.
    #[must_use]
    pub const fn draft_sequence(&self) -> u64 {
        self.autosaver.sequence()
    }

    /// Renders the page state.
    ///
    /// # Errors
    ///
    /// Returns an error if the form data cannot be serialized.
    pub fn view(&self) -> Result<SessionView, ApiError> {
        let offer: Option<DraftOfferView> =
            self.draft_offer.as_ref().map(|pending| DraftOfferView {
                saved_at: pending.saved_at.clone(),
            });
        SessionView::build(
            &self.session,
            &self.reference,
            offer,
            self.status.clone(),
            self.notices.clone(),
        )
    }

    /// Replaces the blank session with the offered draft.
    ///
    /// The session returns to the first step with no errors. Autosave resumes.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is no longer editable or no draft is on offer.
    pub fn restore_draft(&mut self, cause: Cause) -> Result<(), ApiError> {
        self.ensure_editing()?;
        let pending: PendingDraft<F> = self.take_offer()?;
        self.transition(
            Command::RestoreDraft {
                fields: pending.fields,
            },
            cause,
        )?;
        info!(form = %F::KIND, saved_at = %pending.saved_at, "Draft restored");
        self.notices.push(Notice::info("Draft restored"));
        Ok(())
    }

    /// Deletes the offered draft and keeps the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is no longer editable or no draft is on offer.
    pub async fn discard_draft(&mut self) -> Result<(), ApiError> {
        self.ensure_editing()?;
        self.take_offer()?;
        if !self.autosaver.discard().await {
            self.notices
                .push(Notice::warning("The saved draft could not be removed"));
        }
        // Edits made while the offer was pending were never saved.
        if self.session.is_dirty() {
            self.schedule_autosave();
        }
        Ok(())
    }

    /// Applies one user input.
    ///
    /// # Arguments
    ///
    /// * `request` - The input, addressed by string keys
    /// * `cause` - The event that triggered it
    ///
    /// # Returns
    ///
    /// * What the transition did; a blocked advance is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The page has been submitted or left
    /// - A key or value is not valid for the form
    /// - The navigation target is not allowed
    pub fn dispatch(
        &mut self,
        request: CommandRequest,
        cause: Cause,
    ) -> Result<OutcomeView, ApiError> {
        self.ensure_editing()?;
        let edits_data: bool = request.edits_data();
        let command: Command<F> = request.into_command()?;
        let outcome: TransitionOutcome = self.transition(command, cause)?;
        if edits_data {
            self.schedule_autosave();
        }
        Ok(OutcomeView::from(outcome))
    }

    /// Submits the form.
    ///
    /// If the gate is closed the final step's errors are recorded on the
    /// session and nothing is sent. A failed or timed-out submission leaves
    /// the session untouched so the user can try again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The page has been submitted or left
    /// - The session is not on the final step
    /// - The final step fails validation or is not acknowledged
    /// - The submitter fails or does not answer within the timeout
    pub async fn submit(&mut self, cause: Cause) -> Result<SubmissionReceipt, ApiError> {
        self.ensure_editing()?;

        let payload: F = match prepare_submission(&self.session, &self.reference) {
            Ok(payload) => payload,
            Err(err @ (CoreError::SubmissionBlocked(_) | CoreError::NotAcknowledged)) => {
                self.transition(Command::ValidateStep, cause)?;
                return Err(translate_core_error(err));
            }
            Err(err) => return Err(translate_core_error(err)),
        };

        info!(form = %F::KIND, actor = %self.actor.id, cause = %cause.id, "Submitting form");
        let result: Result<SubmissionReceipt, SubmissionError> = tokio::time::timeout(
            self.config.submit_timeout,
            self.submitter.submit(&payload),
        )
        .await
        .unwrap_or_else(|_| {
            Err(SubmissionError::Timeout {
                millis: self.config.submit_timeout.as_millis(),
            })
        });

        match result {
            Ok(receipt) => {
                self.draft_offer = None;
                self.autosaver.discard().await;
                info!(form = %F::KIND, reference = %receipt.reference, "Form submitted");
                self.notices.push(Notice::info(&format!(
                    "Submitted as {}",
                    receipt.reference
                )));
                self.status = PageStatus::Submitted {
                    reference: receipt.reference.clone(),
                    navigate_to: F::KIND.list_route().to_string(),
                };
                Ok(receipt)
            }
            Err(e) => {
                warn!(form = %F::KIND, error = %e, "Submission failed; form state kept");
                self.notices.push(Notice::error(&e.to_string()));
                Err(ApiError::from(e))
            }
        }
    }

    /// Leaves the form.
    ///
    /// A dirty form is only left once `confirmed` is set. The latest edits
    /// are written to the draft before leaving so they can be restored later.
    ///
    /// # Errors
    ///
    /// Returns an error if the page has already been submitted or left.
    pub async fn cancel(&mut self, confirmed: bool) -> Result<CancelOutcome, ApiError> {
        self.ensure_editing()?;
        if self.session.is_dirty() && !confirmed {
            return Ok(CancelOutcome::ConfirmationRequired);
        }

        self.autosaver.flush().await;
        let navigate_to: String = F::KIND.list_route().to_string();
        info!(form = %F::KIND, %navigate_to, "Form cancelled");
        self.status = PageStatus::Cancelled {
            navigate_to: navigate_to.clone(),
        };
        Ok(CancelOutcome::Left { navigate_to })
    }

    /// Stops the autosave task, writing any pending snapshot first.
    pub async fn close(self) {
        debug!(form = %F::KIND, events = self.journal.len(), "Form page closing");
        self.autosaver.shutdown().await;
    }

    fn transition(
        &mut self,
        command: Command<F>,
        cause: Cause,
    ) -> Result<TransitionOutcome, ApiError> {
        let result: TransitionResult<F> = apply(
            &self.reference,
            &self.session,
            command,
            self.actor.clone(),
            cause,
        )
        .map_err(translate_core_error)?;

        debug!(
            form = %F::KIND,
            action = %result.audit_event.action.name,
            before = %result.audit_event.before.data,
            after = %result.audit_event.after.data,
            "Transition applied"
        );
        self.session = result.new_session;
        self.journal.push(result.audit_event);
        Ok(result.outcome)
    }

    fn schedule_autosave(&mut self) {
        if self.config.autosave && self.draft_offer.is_none() {
            self.autosaver.schedule(self.session.fields());
        }
    }

    fn take_offer(&mut self) -> Result<PendingDraft<F>, ApiError> {
        self.draft_offer
            .take()
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Draft"),
                message: format!("No saved {} draft is on offer", F::KIND),
            })
    }

    fn ensure_editing(&self) -> Result<(), ApiError> {
        match &self.status {
            PageStatus::Editing => Ok(()),
            PageStatus::Submitted { reference, .. } => Err(ApiError::InvalidState {
                message: format!("The form was already submitted as {reference}"),
            }),
            PageStatus::Cancelled { .. } => Err(ApiError::InvalidState {
                message: String::from("The form was cancelled"),
            }),
        }
    }
}

async fn load_draft(store: &SharedDraftStore, draft_key: &str) -> Option<DraftRecord> {
    let result: Result<Option<DraftRecord>, PersistenceError> =
        store.lock().await.restore(draft_key);
    match result {
        Ok(record) => record,
        Err(e) => {
            warn!(draft_key, error = %e, "Draft lookup failed; opening a blank form");
            None
        }
    }
}

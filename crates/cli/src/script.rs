// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The JSON script format: a list of user inputs replayed against a page.

use erp_forms_api::{
    ApiError, CancelOutcome, CommandRequest, FormPage, OutcomeView, SessionView,
    SubmissionReceipt, Submitter,
};
use erp_forms_audit::{AuditEvent, Cause};
use erp_forms_domain::FormSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Accept the stored draft offered at open.
    RestoreDraft,
    /// Delete the stored draft offered at open.
    DiscardDraft,
    /// Send a form command.
    Dispatch { request: CommandRequest },
    /// Press submit.
    Submit,
    /// Press cancel; `confirmed` answers the unsaved-changes prompt.
    Cancel {
        #[serde(default)]
        confirmed: bool,
    },
    /// Let time pass (e.g. for the autosave debounce).
    Wait { millis: u64 },
}

impl ScriptStep {
    const fn name(&self) -> &'static str {
        match self {
            Self::RestoreDraft => "restoreDraft",
            Self::DiscardDraft => "discardDraft",
            Self::Dispatch { .. } => "dispatch",
            Self::Submit => "submit",
            Self::Cancel { .. } => "cancel",
            Self::Wait { .. } => "wait",
        }
    }
}

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// One-based position in the script.
    pub step: usize,
    pub action: &'static str,
    /// The step's result, when it succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    /// The error shown to the user, when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The outcome of a whole script run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub steps: Vec<StepResult>,
    /// The page as it stood after the last step.
    pub session: SessionView,
    /// Audit events, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<Vec<AuditEvent>>,
}

/// Parses a script file's contents.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of steps.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Replays `steps` against `page`.
///
/// A failing step is recorded and the run continues, as a user would
/// carry on after seeing an error.
pub async fn run_script<F: FormSchema, S: Submitter<F>>(
    page: &mut FormPage<F, S>,
    steps: Vec<ScriptStep>,
) -> Vec<StepResult> {
    let mut results: Vec<StepResult> = Vec::with_capacity(steps.len());

    for (index, step) in steps.into_iter().enumerate() {
        let number: usize = index + 1;
        let action: &'static str = step.name();
        let cause: Cause = Cause::new(format!("script-{number}"), format!("Script step {action}"));

        let result: Result<Option<serde_json::Value>, ApiError> = match step {
            ScriptStep::RestoreDraft => page.restore_draft(cause).map(|()| None),
            ScriptStep::DiscardDraft => page.discard_draft().await.map(|()| None),
            ScriptStep::Dispatch { request } => page
                .dispatch(request, cause)
                .and_then(|outcome: OutcomeView| to_detail(&outcome)),
            ScriptStep::Submit => page
                .submit(cause)
                .await
                .and_then(|receipt: SubmissionReceipt| to_detail(&receipt)),
            ScriptStep::Cancel { confirmed } => page
                .cancel(confirmed)
                .await
                .and_then(|outcome: CancelOutcome| to_detail(&outcome)),
            ScriptStep::Wait { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(None)
            }
        };

        let (detail, error) = match result {
            Ok(detail) => {
                info!(step = number, action, "Step completed");
                (detail, None)
            }
            Err(e) => {
                warn!(step = number, action, error = %e, "Step failed");
                (None, Some(e.to_string()))
            }
        };
        results.push(StepResult {
            step: number,
            action,
            detail,
            error,
        });
    }

    results
}

fn to_detail<T: Serialize>(value: &T) -> Result<Option<serde_json::Value>, ApiError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to serialize step result: {e}"),
        })
}

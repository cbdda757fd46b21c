// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use erp_forms::{Command, FormSession, TransitionOutcome, can_submit};
use erp_forms_domain::{FieldValue, FormKind, FormSchema, LocalId, ReferenceData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ApiError, translate_domain_error};

/// A user input addressed by string keys, as it arrives from a page or script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum CommandRequest {
    /// Sets a top-level field.
    SetField {
        /// The field key (e.g. `billingAddress.city`).
        field: String,
        /// The raw input value.
        value: FieldValue,
    },
    /// Appends a blank entry to a collection.
    AddItem {
        /// The collection key.
        collection: String,
    },
    /// Sets one field of a collection entry.
    UpdateItem {
        /// The collection key.
        collection: String,
        /// The entry's local id.
        id: String,
        /// The entry field key.
        field: String,
        /// The raw input value.
        value: FieldValue,
    },
    /// Removes a collection entry.
    RemoveItem {
        /// The collection key.
        collection: String,
        /// The entry's local id.
        id: String,
    },
    /// Runs a form-specific operation, e.g. `{"op": "selectCustomer", "id": "C-001"}`.
    Operation {
        /// The operation payload.
        operation: serde_json::Value,
    },
    /// Moves to the next step if the current one validates.
    Advance,
    /// Moves to the previous step.
    Retreat,
    /// Jumps back to an already reached step.
    JumpTo {
        /// Zero-based step index.
        index: usize,
    },
}

impl CommandRequest {
    /// Resolves the string keys against the form's schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is unknown to the form or the operation
    /// payload does not describe one of its operations.
    pub fn into_command<F: FormSchema>(self) -> Result<Command<F>, ApiError> {
        let command: Command<F> = match self {
            Self::SetField { field, value } => Command::SetField {
                field: field.parse().map_err(translate_domain_error)?,
                value,
            },
            Self::AddItem { collection } => Command::AddItem {
                collection: collection.parse().map_err(translate_domain_error)?,
            },
            Self::UpdateItem {
                collection,
                id,
                field,
                value,
            } => Command::UpdateItem {
                collection: collection.parse().map_err(translate_domain_error)?,
                id: LocalId::new(&id),
                field: field.parse().map_err(translate_domain_error)?,
                value,
            },
            Self::RemoveItem { collection, id } => Command::RemoveItem {
                collection: collection.parse().map_err(translate_domain_error)?,
                id: LocalId::new(&id),
            },
            Self::Operation { operation } => {
                let operation: F::Operation =
                    serde_json::from_value(operation).map_err(|e| ApiError::InvalidInput {
                        field: String::from("operation"),
                        message: e.to_string(),
                    })?;
                Command::Operation(operation)
            }
            Self::Advance => Command::Advance,
            Self::Retreat => Command::Retreat,
            Self::JumpTo { index } => Command::JumpTo { index },
        };
        Ok(command)
    }

    /// Whether the request can change form data (as opposed to only the step).
    #[must_use]
    pub const fn edits_data(&self) -> bool {
        !matches!(self, Self::Advance | Self::Retreat | Self::JumpTo { .. })
    }
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum OutcomeView {
    /// Data changed.
    Applied,
    /// An entry was appended.
    ItemAdded {
        /// The new entry's local id.
        id: String,
    },
    /// The visible step moved (zero-based indices).
    StepChanged {
        /// The step before.
        from: usize,
        /// The step after.
        to: usize,
    },
    /// Advance was refused; see the session errors.
    AdvanceBlocked,
}

impl From<TransitionOutcome> for OutcomeView {
    fn from(outcome: TransitionOutcome) -> Self {
        match outcome {
            TransitionOutcome::Applied => Self::Applied,
            TransitionOutcome::ItemAdded(id) => Self::ItemAdded {
                id: id.value().to_string(),
            },
            TransitionOutcome::StepChanged { from, to } => Self::StepChanged { from, to },
            TransitionOutcome::AdvanceBlocked => Self::AdvanceBlocked,
        }
    }
}

/// One entry of the step indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    /// The step label.
    pub label: String,
    /// The step description.
    pub description: String,
    /// Whether the step is before the current one.
    pub completed: bool,
    /// Whether the step is the current one.
    pub current: bool,
}

/// A stored draft waiting for the user to restore or discard it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOfferView {
    /// When the draft was written (RFC 3339).
    pub saved_at: String,
}

/// Severity of a page notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// The severity.
    pub level: NoticeLevel,
    /// The message text.
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn warning(message: &str) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }
}

/// Where the page is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PageStatus {
    /// The form accepts input.
    Editing,
    /// The record was accepted.
    Submitted {
        /// The receiving system's identifier.
        reference: String,
        /// The list route to navigate to.
        #[serde(rename = "navigateTo")]
        navigate_to: String,
    },
    /// The user left the form.
    Cancelled {
        /// The list route to navigate to.
        #[serde(rename = "navigateTo")]
        navigate_to: String,
    },
}

/// Everything a page needs to render the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// The form kind.
    pub form: FormKind,
    /// Zero-based index of the visible step.
    pub current_step: usize,
    /// The step indicator.
    pub steps: Vec<StepView>,
    /// The form data.
    pub fields: serde_json::Value,
    /// Values computed from the form data.
    pub derived: serde_json::Value,
    /// Field key to validation message.
    pub errors: BTreeMap<String, String>,
    /// Percentage of tracked fields filled.
    pub completion: u8,
    /// Whether the submit control is enabled.
    pub can_submit: bool,
    /// Whether the data differs from a fresh form.
    pub dirty: bool,
    /// A stored draft awaiting a decision.
    pub draft_offer: Option<DraftOfferView>,
    /// The page lifecycle state.
    pub status: PageStatus,
    /// Messages raised since the page opened.
    pub notices: Vec<Notice>,
}

impl SessionView {
    /// Builds the view of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the form data cannot be represented as JSON.
    pub fn build<F: FormSchema>(
        session: &FormSession<F>,
        reference: &ReferenceData,
        draft_offer: Option<DraftOfferView>,
        status: PageStatus,
        notices: Vec<Notice>,
    ) -> Result<Self, ApiError> {
        let current: usize = session.current_step();
        let steps: Vec<StepView> = F::steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                label: step.label.to_string(),
                description: step.description.to_string(),
                completed: index < current,
                current: index == current,
            })
            .collect();

        let fields: serde_json::Value = serde_json::to_value(session.fields()).map_err(internal)?;
        let derived: serde_json::Value =
            serde_json::to_value(session.derived()).map_err(internal)?;

        Ok(Self {
            form: F::KIND,
            current_step: current,
            steps,
            fields,
            derived,
            errors: session
                .errors()
                .iter()
                .map(|(key, message)| (key.to_string(), message.to_string()))
                .collect(),
            completion: session.completion(),
            can_submit: can_submit(session, reference),
            dirty: session.is_dirty(),
            draft_offer,
            status,
            notices,
        })
    }
}

fn internal(err: serde_json::Error) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to serialize session: {err}"),
    }
}

/// The answer to a cancel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum CancelOutcome {
    /// The form has unsaved changes; ask before leaving.
    ConfirmationRequired,
    /// The page was left.
    Left {
        /// The list route to navigate to.
        #[serde(rename = "navigateTo")]
        navigate_to: String,
    },
}

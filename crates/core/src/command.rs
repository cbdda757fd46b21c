// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use erp_forms_domain::{FieldValue, FormSchema, Keyed, LocalId};

/// Commands represent user or system intent as data only.
/// Commands are the only way to change a form session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<F: FormSchema> {
    /// Replace one scalar field.
    SetField { field: F::Field, value: FieldValue },
    /// Append a blank sub-record to a collection.
    AddItem { collection: F::Collection },
    /// Replace one field of an existing sub-record.
    UpdateItem {
        collection: F::Collection,
        id: LocalId,
        field: F::ItemField,
        value: FieldValue,
    },
    /// Remove a sub-record by id.
    RemoveItem { collection: F::Collection, id: LocalId },
    /// Run a form-specific multi-field operation.
    Operation(F::Operation),
    /// Validate the current step and move forward if it passes.
    Advance,
    /// Move back one step without validating.
    Retreat,
    /// Jump to a step that has already been reached.
    JumpTo { index: usize },
    /// Re-run the current step's rules without moving.
    ValidateStep,
    /// Replace the form data with a restored draft and return to step one.
    RestoreDraft { fields: F },
}

impl<F: FormSchema> Command<F> {
    /// The stable action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetField { .. } => "SetField",
            Self::AddItem { .. } => "AddItem",
            Self::UpdateItem { .. } => "UpdateItem",
            Self::RemoveItem { .. } => "RemoveItem",
            Self::Operation(_) => "Operation",
            Self::Advance => "Advance",
            Self::Retreat => "Retreat",
            Self::JumpTo { .. } => "JumpTo",
            Self::ValidateStep => "ValidateStep",
            Self::RestoreDraft { .. } => "RestoreDraft",
        }
    }

    /// A short human-readable description of the target, if any.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::SetField { field, .. } => Some(format!("field={}", field.key())),
            Self::AddItem { collection } => Some(format!("collection={}", collection.key())),
            Self::UpdateItem {
                collection,
                id,
                field,
                ..
            } => Some(format!(
                "collection={} id={id} field={}",
                collection.key(),
                field.key()
            )),
            Self::RemoveItem { collection, id } => {
                Some(format!("collection={} id={id}", collection.key()))
            }
            Self::Operation(operation) => Some(format!("{operation:?}")),
            Self::JumpTo { index } => Some(format!("step={}", index + 1)),
            Self::Advance | Self::Retreat | Self::ValidateStep | Self::RestoreDraft { .. } => None,
        }
    }
}

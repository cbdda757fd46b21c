// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The contract every concrete form type implements.
//!
//! A form is a fixed schema (one struct per form kind) plus a static table
//! of steps and a lookup from step to its ordered list of rule functions.
//! The session layer drives any form through this trait without knowing
//! its shape.

use crate::error::DomainError;
use crate::reference::ReferenceData;
use crate::types::{FieldKey, FieldValue, FormKind, LocalId, StepDefinition, ValidationErrors};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::str::FromStr;

/// One validation rule. Rules append messages for the fields they check.
pub type StepRule<F> = fn(&F, &ReferenceData, &mut ValidationErrors);

/// An addressable key enum (fields, collections, item fields).
pub trait Keyed: Copy + Eq + Debug + FromStr<Err = DomainError> + Send + Sync + 'static {
    /// The stable key this variant is addressed and reported by.
    fn key(self) -> FieldKey;
}

/// Generates a key enum with its `Keyed` and `FromStr` implementations.
macro_rules! keyed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $form:literal, unknown = $unknown:ident {
            $($variant:ident => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl $crate::form::Keyed for $name {
            fn key(self) -> $crate::types::FieldKey {
                match self {
                    $(Self::$variant => $key),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| $crate::form::Keyed::key(*variant) == s)
                    .ok_or_else(|| $crate::error::DomainError::$unknown {
                        form: $form,
                        key: s.to_string(),
                    })
            }
        }
    };
}

pub(crate) use keyed_enum;

/// A concrete stepped form.
pub trait FormSchema:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Top-level and dotted nested scalar fields.
    type Field: Keyed;
    /// Repeated sub-record collections.
    type Collection: Keyed;
    /// Fields of the sub-records, across all collections of this form.
    type ItemField: Keyed;
    /// Step identifiers, in order.
    type Step: Copy + Eq + Debug + Send + Sync + 'static;
    /// Form-specific operations that touch several fields at once.
    type Operation: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync;
    /// Values computed from the fields. Never user-editable.
    type Derived: Clone + Debug + PartialEq + Serialize + Send + Sync;

    /// The form kind this schema implements.
    const KIND: FormKind;

    /// The ordered step table.
    fn steps() -> &'static [StepDefinition<Self::Step>];

    /// The rules checked when leaving `step`.
    fn rules(step: Self::Step) -> &'static [StepRule<Self>];

    /// Replaces one scalar field.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to the field's type.
    fn set_field(&mut self, field: Self::Field, value: FieldValue) -> Result<(), DomainError>;

    /// Appends a blank sub-record and returns its local id.
    fn add_item(&mut self, collection: Self::Collection) -> LocalId;

    /// Replaces one field of the sub-record addressed by `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No item has the given id
    /// - The field does not belong to the collection
    /// - The value cannot be converted to the field's type
    fn update_item(
        &mut self,
        collection: Self::Collection,
        id: &LocalId,
        field: Self::ItemField,
        value: FieldValue,
    ) -> Result<(), DomainError>;

    /// Removes the sub-record addressed by `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if no item has the given id, or if the collection
    /// must keep at least one item.
    fn remove_item(&mut self, collection: Self::Collection, id: &LocalId)
    -> Result<(), DomainError>;

    /// Applies a form-specific operation.
    ///
    /// # Returns
    ///
    /// * The keys of every field the operation changed
    ///
    /// # Errors
    ///
    /// Returns an error if a reference lookup fails.
    fn apply_operation(
        &mut self,
        operation: &Self::Operation,
        reference: &ReferenceData,
    ) -> Result<Vec<FieldKey>, DomainError>;

    /// The blank form a new session starts from.
    ///
    /// Forms whose defaults come from the reference data override this.
    #[must_use]
    fn blank(_reference: &ReferenceData) -> Self {
        Self::default()
    }

    /// Recomputes every derived value.
    fn derive(&self, reference: &ReferenceData) -> Self::Derived;

    /// Whether the acknowledgement flag on the final step is set.
    fn acknowledged(&self) -> bool;

    /// Percentage of the tracked required fields currently filled.
    fn completion(&self) -> u8;

    /// The number of steps.
    #[must_use]
    fn step_count() -> usize {
        Self::steps().len()
    }

    /// Runs every rule for the step at `index`.
    ///
    /// An out-of-range index has no rules and yields no errors.
    fn validate_step(&self, index: usize, reference: &ReferenceData) -> ValidationErrors {
        let mut errors: ValidationErrors = ValidationErrors::new();
        if let Some(step) = Self::steps().get(index) {
            for rule in Self::rules(step.id) {
                rule(self, reference, &mut errors);
            }
        }
        errors
    }
}

/// Maps an item-not-found lookup into a `DomainError`.
pub(crate) fn item_not_found(collection: FieldKey, id: &LocalId) -> DomainError {
    DomainError::ItemNotFound {
        collection,
        id: id.value().to_string(),
    }
}

/// Maps a wrong collection/field pairing into a `DomainError`.
pub(crate) fn not_in_collection(collection: FieldKey, field: FieldKey) -> DomainError {
    DomainError::FieldNotInCollection {
        collection,
        field: field.to_string(),
    }
}

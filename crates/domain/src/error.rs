// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised when a form mutation is addressed or typed incorrectly.
///
/// These are never validation failures. Validation failures are collected
/// into `ValidationErrors` and shown next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The form kind name is not recognised.
    UnknownFormKind(String),
    /// The field key does not exist on this form.
    UnknownField {
        /// The form the key was resolved against.
        form: &'static str,
        /// The key that failed to resolve.
        key: String,
    },
    /// The collection key does not exist on this form.
    UnknownCollection {
        /// The form the key was resolved against.
        form: &'static str,
        /// The key that failed to resolve.
        key: String,
    },
    /// The item field does not belong to the addressed collection.
    FieldNotInCollection {
        /// The collection key.
        collection: &'static str,
        /// The item field key.
        field: String,
    },
    /// The value kind does not match the field kind.
    FieldTypeMismatch {
        /// The field key.
        field: String,
        /// The kind of value the field accepts.
        expected: &'static str,
    },
    /// The value has the right kind but is out of range or not an allowed choice.
    InvalidFieldValue {
        /// The field key.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// No item with this local id exists in the collection.
    ItemNotFound {
        /// The collection key.
        collection: &'static str,
        /// The local id that was looked up.
        id: String,
    },
    /// The collection must keep at least one item.
    LastItemRemoval {
        /// The collection key.
        collection: &'static str,
    },
    /// A reference-data lookup failed for a form operation.
    ReferenceNotFound {
        /// The kind of reference entry (customer, catalog item, ...).
        kind: &'static str,
        /// The key that was looked up.
        key: String,
    },
    /// The form operation cannot be applied to this form kind.
    UnsupportedOperation(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFormKind(name) => write!(f, "Unknown form kind '{name}'"),
            Self::UnknownField { form, key } => {
                write!(f, "Form '{form}' has no field '{key}'")
            }
            Self::UnknownCollection { form, key } => {
                write!(f, "Form '{form}' has no collection '{key}'")
            }
            Self::FieldNotInCollection { collection, field } => {
                write!(f, "Collection '{collection}' has no item field '{field}'")
            }
            Self::FieldTypeMismatch { field, expected } => {
                write!(f, "Field '{field}' expects a {expected} value")
            }
            Self::InvalidFieldValue { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::ItemNotFound { collection, id } => {
                write!(f, "No item with id '{id}' in '{collection}'")
            }
            Self::LastItemRemoval { collection } => {
                write!(f, "'{collection}' must keep at least one item")
            }
            Self::ReferenceNotFound { kind, key } => {
                write!(f, "No {kind} found for '{key}'")
            }
            Self::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}

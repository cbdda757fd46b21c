// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The stable key a field is addressed and reported by (e.g. `billingAddress.city`).
pub type FieldKey = &'static str;

/// The form types that run as stepped sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    /// Procurement purchase requisition.
    PurchaseRequisition,
    /// Finance sales invoice.
    Invoice,
    /// Project creation.
    Project,
    /// Quality inspection scheduling.
    QualityInspection,
}

impl FormKind {
    /// All form kinds, in menu order.
    pub const ALL: [Self; 4] = [
        Self::PurchaseRequisition,
        Self::Invoice,
        Self::Project,
        Self::QualityInspection,
    ];

    /// The kebab-case name used in scripts and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PurchaseRequisition => "purchase-requisition",
            Self::Invoice => "invoice",
            Self::Project => "project",
            Self::QualityInspection => "quality-inspection",
        }
    }

    /// The fixed draft-store key for this form kind.
    ///
    /// Only one in-flight draft per form kind exists on a device.
    #[must_use]
    pub const fn draft_key(self) -> &'static str {
        match self {
            Self::PurchaseRequisition => "purchase-requisition-draft",
            Self::Invoice => "invoice-draft",
            Self::Project => "project-create-form",
            Self::QualityInspection => "quality-inspection-draft",
        }
    }

    /// The list page a finished or cancelled session navigates to.
    #[must_use]
    pub const fn list_route(self) -> &'static str {
        match self {
            Self::PurchaseRequisition => "/procurement/requisitions",
            Self::Invoice => "/finance/invoices",
            Self::Project => "/project-management",
            Self::QualityInspection => "/quality/inspections",
        }
    }

    /// The autosave debounce interval, in milliseconds.
    #[must_use]
    pub const fn default_debounce_millis(self) -> u64 {
        match self {
            Self::Project => 3000,
            Self::PurchaseRequisition | Self::Invoice | Self::QualityInspection => 2000,
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DomainError::UnknownFormKind(s.to_string()))
    }
}

/// A raw value entered into a field.
///
/// Inputs arrive loosely typed; each form converts them into its own field types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A checkbox or toggle.
    Flag(bool),
    /// A numeric input.
    Number(f64),
    /// A text input, select, or date string.
    Text(String),
    /// A cleared input.
    Empty,
}

impl FieldValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Converts into a string, treating `Empty` as the empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is a number or flag.
    pub fn into_text(self, field: &str) -> Result<String, DomainError> {
        match self {
            Self::Text(value) => Ok(value),
            Self::Empty => Ok(String::new()),
            Self::Flag(_) | Self::Number(_) => Err(DomainError::FieldTypeMismatch {
                field: field.to_string(),
                expected: "text",
            }),
        }
    }

    /// Converts into a finite number, parsing numeric text and treating
    /// `Empty` or blank text as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is a flag, non-numeric text, or not finite.
    pub fn into_number(self, field: &str) -> Result<f64, DomainError> {
        Ok(self.into_optional_number(field)?.unwrap_or(0.0))
    }

    /// Converts into an optional finite number. `Empty` and blank text clear the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is a flag, non-numeric text, or not finite.
    pub fn into_optional_number(self, field: &str) -> Result<Option<f64>, DomainError> {
        let number: f64 = match self {
            Self::Number(value) => value,
            Self::Empty => return Ok(None),
            Self::Text(text) => {
                let trimmed: &str = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| DomainError::InvalidFieldValue {
                        field: field.to_string(),
                        reason: format!("'{trimmed}' is not a number"),
                    })?
            }
            Self::Flag(_) => {
                return Err(DomainError::FieldTypeMismatch {
                    field: field.to_string(),
                    expected: "number",
                });
            }
        };
        if !number.is_finite() {
            return Err(DomainError::InvalidFieldValue {
                field: field.to_string(),
                reason: String::from("number must be finite"),
            });
        }
        Ok(Some(number))
    }

    /// Converts into a whole, non-negative count.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a number or not a whole count.
    pub fn into_count(self, field: &str) -> Result<u32, DomainError> {
        let number: f64 = self.into_number(field)?;
        if number.fract() != 0.0 {
            return Err(DomainError::InvalidFieldValue {
                field: field.to_string(),
                reason: format!("{number} is not a whole number"),
            });
        }
        number.to_u32().ok_or_else(|| DomainError::InvalidFieldValue {
            field: field.to_string(),
            reason: format!("{number} is not a valid count"),
        })
    }

    /// Converts into a boolean, treating `Empty` as `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is text or a number.
    pub fn into_flag(self, field: &str) -> Result<bool, DomainError> {
        match self {
            Self::Flag(value) => Ok(value),
            Self::Empty => Ok(false),
            Self::Text(_) | Self::Number(_) => Err(DomainError::FieldTypeMismatch {
                field: field.to_string(),
                expected: "boolean",
            }),
        }
    }

    /// Converts text into one of a fixed set of choices.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not text or is not a recognised choice.
    pub fn into_choice<T: FromStr>(self, field: &str) -> Result<T, DomainError> {
        let text: String = self.into_text(field)?;
        text.parse::<T>()
            .map_err(|_| DomainError::InvalidFieldValue {
                field: field.to_string(),
                reason: format!("'{text}' is not an allowed choice"),
            })
    }
}

/// An identifier unique only within its parent collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(String);

impl LocalId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sub-record owned by a form collection.
pub trait LocalItem {
    /// The item's local id.
    fn local_id(&self) -> &LocalId;
}

/// An ordered collection of sub-records addressed by local id.
///
/// Ids come from a per-collection sequence that never reuses a value, so
/// removing an item never changes the id of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemList<T> {
    items: Vec<T>,
    next_seq: u64,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_seq: 1,
        }
    }
}

impl<T: LocalItem> ItemList<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new item built around a freshly generated id.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The id prefix for this collection (e.g. `item`)
    /// * `build` - Constructs the item from its id
    pub fn push_with(&mut self, prefix: &str, build: impl FnOnce(LocalId) -> T) -> LocalId {
        let id: LocalId = LocalId(format!("{prefix}-{}", self.next_seq));
        self.next_seq += 1;
        self.items.push(build(id.clone()));
        id
    }

    /// Removes the item with the given id.
    pub fn remove(&mut self, id: &LocalId) -> Option<T> {
        let index: usize = self.items.iter().position(|item| item.local_id() == id)?;
        Some(self.items.remove(index))
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &LocalId) -> Option<&T> {
        self.items.iter().find(|item| item.local_id() == id)
    }

    /// Looks up an item by id for mutation.
    pub fn get_mut(&mut self, id: &LocalId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.local_id() == id)
    }

    /// Iterates items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a ItemList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One stage of a wizard. Static for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition<S: 'static> {
    /// The step identifier.
    pub id: S,
    /// The display label.
    pub label: &'static str,
    /// A short description shown under the label.
    pub description: &'static str,
}

/// Field-level validation messages keyed by field key.
///
/// Collection-level failures use the collection key (e.g. `items`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldKey, String>);

impl ValidationErrors {
    /// Creates an empty error map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a message for a field, replacing any earlier message for it.
    pub fn insert(&mut self, key: FieldKey, message: &str) {
        self.0.insert(key, message.to_string());
    }

    /// Clears the message for a field.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// The message for a field, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a field has a message.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The failing field keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    /// Iterates `(key, message)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }
}

/// Urgency shared by the requisition, project and inspection forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(DomainError::InvalidFieldValue {
                field: String::from("priority"),
                reason: format!("'{other}' is not a priority"),
            }),
        }
    }
}

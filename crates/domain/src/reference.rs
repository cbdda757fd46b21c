// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only lookup lists consumed by the form rules and operations.
//!
//! Reference data is immutable for the duration of a session. Membership
//! rules only apply when the relevant list is non-empty, so a session
//! without catalogues still validates required fields.

use serde::{Deserialize, Serialize};

/// A user who can approve requisitions up to a monetary limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approver {
    /// Directory identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub role: String,
    /// The largest estimated total this approver may sign off.
    pub approval_limit: f64,
}

/// A known delivery point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLocation {
    /// Location code selected on the form.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Full postal address.
    #[serde(default)]
    pub address: String,
}

/// A purchasable catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub unit: String,
    /// Last known unit price.
    pub unit_price: f64,
}

/// A billable customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// GST identification number.
    #[serde(default)]
    pub gstin: String,
    pub billing_state: String,
    pub shipping_state: String,
}

/// The lookup lists available to one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceData {
    pub approvers: Vec<Approver>,
    pub delivery_locations: Vec<DeliveryLocation>,
    pub catalog: Vec<CatalogItem>,
    pub customers: Vec<Customer>,
    pub inspectors: Vec<String>,
    /// The seller's tax jurisdiction, compared against the buyer's to split tax.
    pub seller_state: String,
}

impl ReferenceData {
    /// Finds an approver by id.
    #[must_use]
    pub fn approver(&self, id: &str) -> Option<&Approver> {
        self.approvers.iter().find(|approver| approver.id == id)
    }

    /// Finds a delivery location by code.
    #[must_use]
    pub fn delivery_location(&self, code: &str) -> Option<&DeliveryLocation> {
        self.delivery_locations
            .iter()
            .find(|location| location.code == code)
    }

    /// Finds a catalogue item by code.
    #[must_use]
    pub fn catalog_item(&self, code: &str) -> Option<&CatalogItem> {
        self.catalog.iter().find(|item| item.code == code)
    }

    /// Finds a customer by id.
    #[must_use]
    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id == id)
    }

    /// Whether the approver id is acceptable. Any id is accepted when no
    /// approver list is loaded.
    #[must_use]
    pub fn accepts_approver(&self, id: &str) -> bool {
        self.approvers.is_empty() || self.approver(id).is_some()
    }

    /// Whether the location code is acceptable. Any code is accepted when no
    /// location list is loaded.
    #[must_use]
    pub fn accepts_delivery_location(&self, code: &str) -> bool {
        self.delivery_locations.is_empty() || self.delivery_location(code).is_some()
    }

    /// Whether the inspector is acceptable. Any name is accepted when no
    /// inspector list is loaded.
    #[must_use]
    pub fn accepts_inspector(&self, name: &str) -> bool {
        self.inspectors.is_empty() || self.inspectors.iter().any(|inspector| inspector == name)
    }

    /// Picks the approver with the lowest limit that still covers `amount`.
    ///
    /// # Returns
    ///
    /// * `None` if no approver's limit covers the amount
    #[must_use]
    pub fn suggested_approver(&self, amount: f64) -> Option<&Approver> {
        self.approvers
            .iter()
            .filter(|approver| approver.approval_limit >= amount)
            .min_by(|a, b| a.approval_limit.total_cmp(&b.approval_limit))
    }
}

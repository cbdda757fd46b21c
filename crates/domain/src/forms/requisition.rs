// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Procurement purchase requisition, five steps.

use crate::error::DomainError;
use crate::form::{FormSchema, Keyed, StepRule, item_not_found, keyed_enum};
use crate::reference::{Approver, CatalogItem, DeliveryLocation, ReferenceData};
use crate::totals::{LineTotal, completion_percent, line_subtotal};
use crate::types::{
    FieldKey, FieldValue, FormKind, ItemList, LocalId, LocalItem, Priority, StepDefinition,
    ValidationErrors,
};
use crate::validation::{is_blank, require_date, require_email, require_text};
use serde::{Deserialize, Serialize};

const ITEM_PREFIX: &str = "item";
const TRACKED_FIELD_COUNT: usize = 11;

/// Requisition steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionStep {
    BasicInfo,
    Items,
    Delivery,
    Budget,
    Review,
}

const STEPS: &[StepDefinition<RequisitionStep>] = &[
    StepDefinition {
        id: RequisitionStep::BasicInfo,
        label: "Basic Info",
        description: "Requester details",
    },
    StepDefinition {
        id: RequisitionStep::Items,
        label: "Items",
        description: "What to procure",
    },
    StepDefinition {
        id: RequisitionStep::Delivery,
        label: "Delivery",
        description: "When & where",
    },
    StepDefinition {
        id: RequisitionStep::Budget,
        label: "Budget",
        description: "Approval & budget",
    },
    StepDefinition {
        id: RequisitionStep::Review,
        label: "Review",
        description: "Submit",
    },
];

keyed_enum! {
    /// Scalar fields of a requisition.
    pub enum RequisitionField in "purchase-requisition", unknown = UnknownField {
        PrNumber => "prNumber",
        RequestDate => "requestDate",
        Department => "department",
        RequestedBy => "requestedBy",
        RequestedByEmail => "requestedByEmail",
        RequestedByPhone => "requestedByPhone",
        Priority => "priority",
        Purpose => "purpose",
        ProjectCode => "projectCode",
        CostCenter => "costCenter",
        DeliveryDate => "deliveryDate",
        DeliveryLocation => "deliveryLocation",
        DeliveryAddress => "deliveryAddress",
        DeliveryInstructions => "deliveryInstructions",
        ContactPerson => "contactPerson",
        ContactPhone => "contactPhone",
        BudgetCode => "budgetCode",
        BudgetAvailable => "budgetAvailable",
        CurrencyCode => "currencyCode",
        Approver => "approver",
        Justification => "justification",
        AlternativeOptions => "alternativeOptions",
        Notes => "notes",
        TermsAccepted => "termsAccepted",
    }
}

keyed_enum! {
    /// Requisition collections.
    pub enum RequisitionCollection in "purchase-requisition", unknown = UnknownCollection {
        Items => "items",
    }
}

keyed_enum! {
    /// Fields of a requisition line.
    pub enum RequisitionItemField in "purchase-requisition", unknown = UnknownField {
        ItemCode => "itemCode",
        ItemName => "itemName",
        Description => "description",
        Category => "category",
        Quantity => "quantity",
        Unit => "unit",
        EstimatedPrice => "estimatedPrice",
    }
}

/// One requested line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionItem {
    pub id: LocalId,
    pub item_code: String,
    pub item_name: String,
    pub description: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub estimated_price: f64,
}

impl RequisitionItem {
    fn blank(id: LocalId) -> Self {
        Self {
            id,
            item_code: String::new(),
            item_name: String::new(),
            description: String::new(),
            category: String::new(),
            quantity: 1.0,
            unit: String::from("Pcs"),
            estimated_price: 0.0,
        }
    }

    fn from_catalog(id: LocalId, entry: &CatalogItem, quantity: f64) -> Self {
        Self {
            id,
            item_code: entry.code.clone(),
            item_name: entry.name.clone(),
            description: entry.description.clone(),
            category: entry.category.clone(),
            quantity,
            unit: entry.unit.clone(),
            estimated_price: entry.unit_price,
        }
    }

    /// `quantity × estimated_price`.
    #[must_use]
    pub fn total(&self) -> f64 {
        line_subtotal(self.quantity, self.estimated_price)
    }
}

impl LocalItem for RequisitionItem {
    fn local_id(&self) -> &LocalId {
        &self.id
    }
}

/// Operations that fill several requisition fields from reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RequisitionOperation {
    /// Adds a catalogue entry as a new line.
    AddCatalogItem { code: String, quantity: f64 },
    /// Selects a delivery location and fills its address.
    ChooseDeliveryLocation { code: String },
    /// Sets the approver to the one suggested for the estimated total.
    ApplySuggestedApprover,
}

/// Derived requisition values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionTotals {
    pub line_totals: Vec<LineTotal>,
    pub estimated_total: f64,
    /// `budget_available - estimated_total`, when a budget was entered.
    pub budget_remaining: Option<f64>,
    /// The approver with the lowest limit covering the estimated total.
    pub suggested_approver: Option<String>,
    pub completion: u8,
}

/// A purchase requisition being authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseRequisition {
    pub pr_number: String,
    pub request_date: String,
    pub department: String,
    pub requested_by: String,
    pub requested_by_email: String,
    pub requested_by_phone: String,
    pub priority: Priority,
    pub purpose: String,
    pub project_code: String,
    pub cost_center: String,
    pub delivery_date: String,
    pub delivery_location: String,
    pub delivery_address: String,
    pub delivery_instructions: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub items: ItemList<RequisitionItem>,
    pub budget_code: String,
    pub budget_available: Option<f64>,
    pub currency_code: String,
    pub approver: String,
    pub justification: String,
    pub alternative_options: String,
    pub notes: String,
    pub terms_accepted: bool,
}

impl Default for PurchaseRequisition {
    fn default() -> Self {
        Self {
            pr_number: String::new(),
            request_date: String::new(),
            department: String::new(),
            requested_by: String::new(),
            requested_by_email: String::new(),
            requested_by_phone: String::new(),
            priority: Priority::Medium,
            purpose: String::new(),
            project_code: String::new(),
            cost_center: String::new(),
            delivery_date: String::new(),
            delivery_location: String::new(),
            delivery_address: String::new(),
            delivery_instructions: String::new(),
            contact_person: String::new(),
            contact_phone: String::new(),
            items: ItemList::new(),
            budget_code: String::new(),
            budget_available: None,
            currency_code: String::from("INR"),
            approver: String::new(),
            justification: String::new(),
            alternative_options: String::new(),
            notes: String::new(),
            terms_accepted: false,
        }
    }
}

impl PurchaseRequisition {
    /// Sum of every line total.
    #[must_use]
    pub fn estimated_total(&self) -> f64 {
        self.items.iter().map(RequisitionItem::total).sum()
    }
}

fn check_requester(form: &PurchaseRequisition, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        RequisitionField::Department.key(),
        &form.department,
        "Department required",
    );
    require_text(
        errors,
        RequisitionField::RequestedBy.key(),
        &form.requested_by,
        "Name required",
    );
    require_email(
        errors,
        RequisitionField::RequestedByEmail.key(),
        &form.requested_by_email,
    );
    require_text(
        errors,
        RequisitionField::Purpose.key(),
        &form.purpose,
        "Purpose required",
    );
}

fn check_items(form: &PurchaseRequisition, _: &ReferenceData, errors: &mut ValidationErrors) {
    if form.items.is_empty() {
        errors.insert(RequisitionCollection::Items.key(), "Add at least one item");
    }
}

fn check_delivery(
    form: &PurchaseRequisition,
    reference: &ReferenceData,
    errors: &mut ValidationErrors,
) {
    require_date(
        errors,
        RequisitionField::DeliveryDate.key(),
        &form.delivery_date,
        "Delivery date required",
    );
    let key: FieldKey = RequisitionField::DeliveryLocation.key();
    if require_text(errors, key, &form.delivery_location, "Location required")
        && !reference.accepts_delivery_location(&form.delivery_location)
    {
        errors.insert(key, "Unknown delivery location");
    }
}

fn check_budget(
    form: &PurchaseRequisition,
    reference: &ReferenceData,
    errors: &mut ValidationErrors,
) {
    require_text(
        errors,
        RequisitionField::BudgetCode.key(),
        &form.budget_code,
        "Budget code required",
    );
    let key: FieldKey = RequisitionField::Approver.key();
    if require_text(errors, key, &form.approver, "Approver required")
        && !reference.accepts_approver(&form.approver)
    {
        errors.insert(key, "Unknown approver");
    }
    require_text(
        errors,
        RequisitionField::Justification.key(),
        &form.justification,
        "Justification required",
    );
}

fn check_terms(form: &PurchaseRequisition, _: &ReferenceData, errors: &mut ValidationErrors) {
    if !form.terms_accepted {
        errors.insert(
            RequisitionField::TermsAccepted.key(),
            "Accept terms to proceed",
        );
    }
}

const BASIC_INFO_RULES: &[StepRule<PurchaseRequisition>] = &[check_requester];
const ITEMS_RULES: &[StepRule<PurchaseRequisition>] = &[check_items];
const DELIVERY_RULES: &[StepRule<PurchaseRequisition>] = &[check_delivery];
const BUDGET_RULES: &[StepRule<PurchaseRequisition>] = &[check_budget];
const REVIEW_RULES: &[StepRule<PurchaseRequisition>] = &[check_terms];

impl FormSchema for PurchaseRequisition {
    type Field = RequisitionField;
    type Collection = RequisitionCollection;
    type ItemField = RequisitionItemField;
    type Step = RequisitionStep;
    type Operation = RequisitionOperation;
    type Derived = RequisitionTotals;

    const KIND: FormKind = FormKind::PurchaseRequisition;

    fn steps() -> &'static [StepDefinition<RequisitionStep>] {
        STEPS
    }

    fn rules(step: RequisitionStep) -> &'static [StepRule<Self>] {
        match step {
            RequisitionStep::BasicInfo => BASIC_INFO_RULES,
            RequisitionStep::Items => ITEMS_RULES,
            RequisitionStep::Delivery => DELIVERY_RULES,
            RequisitionStep::Budget => BUDGET_RULES,
            RequisitionStep::Review => REVIEW_RULES,
        }
    }

    fn set_field(&mut self, field: RequisitionField, value: FieldValue) -> Result<(), DomainError> {
        let key: FieldKey = field.key();
        match field {
            RequisitionField::PrNumber => self.pr_number = value.into_text(key)?,
            RequisitionField::RequestDate => self.request_date = value.into_text(key)?,
            RequisitionField::Department => self.department = value.into_text(key)?,
            RequisitionField::RequestedBy => self.requested_by = value.into_text(key)?,
            RequisitionField::RequestedByEmail => {
                self.requested_by_email = value.into_text(key)?;
            }
            RequisitionField::RequestedByPhone => {
                self.requested_by_phone = value.into_text(key)?;
            }
            RequisitionField::Priority => self.priority = value.into_choice(key)?,
            RequisitionField::Purpose => self.purpose = value.into_text(key)?,
            RequisitionField::ProjectCode => self.project_code = value.into_text(key)?,
            RequisitionField::CostCenter => self.cost_center = value.into_text(key)?,
            RequisitionField::DeliveryDate => self.delivery_date = value.into_text(key)?,
            RequisitionField::DeliveryLocation => {
                self.delivery_location = value.into_text(key)?;
            }
            RequisitionField::DeliveryAddress => self.delivery_address = value.into_text(key)?,
            RequisitionField::DeliveryInstructions => {
                self.delivery_instructions = value.into_text(key)?;
            }
            RequisitionField::ContactPerson => self.contact_person = value.into_text(key)?,
            RequisitionField::ContactPhone => self.contact_phone = value.into_text(key)?,
            RequisitionField::BudgetCode => self.budget_code = value.into_text(key)?,
            RequisitionField::BudgetAvailable => {
                self.budget_available = value.into_optional_number(key)?;
            }
            RequisitionField::CurrencyCode => self.currency_code = value.into_text(key)?,
            RequisitionField::Approver => self.approver = value.into_text(key)?,
            RequisitionField::Justification => self.justification = value.into_text(key)?,
            RequisitionField::AlternativeOptions => {
                self.alternative_options = value.into_text(key)?;
            }
            RequisitionField::Notes => self.notes = value.into_text(key)?,
            RequisitionField::TermsAccepted => self.terms_accepted = value.into_flag(key)?,
        }
        Ok(())
    }

    fn add_item(&mut self, collection: RequisitionCollection) -> LocalId {
        match collection {
            RequisitionCollection::Items => self.items.push_with(ITEM_PREFIX, RequisitionItem::blank),
        }
    }

    fn update_item(
        &mut self,
        collection: RequisitionCollection,
        id: &LocalId,
        field: RequisitionItemField,
        value: FieldValue,
    ) -> Result<(), DomainError> {
        let RequisitionCollection::Items = collection;
        let item: &mut RequisitionItem = self
            .items
            .get_mut(id)
            .ok_or_else(|| item_not_found(collection.key(), id))?;
        let key: FieldKey = field.key();
        match field {
            RequisitionItemField::ItemCode => item.item_code = value.into_text(key)?,
            RequisitionItemField::ItemName => item.item_name = value.into_text(key)?,
            RequisitionItemField::Description => item.description = value.into_text(key)?,
            RequisitionItemField::Category => item.category = value.into_text(key)?,
            RequisitionItemField::Quantity => item.quantity = value.into_number(key)?,
            RequisitionItemField::Unit => item.unit = value.into_text(key)?,
            RequisitionItemField::EstimatedPrice => item.estimated_price = value.into_number(key)?,
        }
        Ok(())
    }

    fn remove_item(
        &mut self,
        collection: RequisitionCollection,
        id: &LocalId,
    ) -> Result<(), DomainError> {
        let RequisitionCollection::Items = collection;
        self.items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| item_not_found(collection.key(), id))
    }

    fn apply_operation(
        &mut self,
        operation: &RequisitionOperation,
        reference: &ReferenceData,
    ) -> Result<Vec<FieldKey>, DomainError> {
        match operation {
            RequisitionOperation::AddCatalogItem { code, quantity } => {
                let entry: &CatalogItem =
                    reference
                        .catalog_item(code)
                        .ok_or_else(|| DomainError::ReferenceNotFound {
                            kind: "catalog item",
                            key: code.clone(),
                        })?;
                if !quantity.is_finite() || *quantity <= 0.0 {
                    return Err(DomainError::InvalidFieldValue {
                        field: String::from("quantity"),
                        reason: String::from("quantity must be greater than zero"),
                    });
                }
                self.items.push_with(ITEM_PREFIX, |id| {
                    RequisitionItem::from_catalog(id, entry, *quantity)
                });
                Ok(vec![RequisitionCollection::Items.key()])
            }
            RequisitionOperation::ChooseDeliveryLocation { code } => {
                let location: &DeliveryLocation = reference
                    .delivery_location(code)
                    .ok_or_else(|| DomainError::ReferenceNotFound {
                        kind: "delivery location",
                        key: code.clone(),
                    })?;
                self.delivery_location.clone_from(&location.code);
                self.delivery_address.clone_from(&location.address);
                Ok(vec![
                    RequisitionField::DeliveryLocation.key(),
                    RequisitionField::DeliveryAddress.key(),
                ])
            }
            RequisitionOperation::ApplySuggestedApprover => {
                let total: f64 = self.estimated_total();
                let approver: &Approver = reference.suggested_approver(total).ok_or_else(|| {
                    DomainError::ReferenceNotFound {
                        kind: "approver",
                        key: format!("an approval limit of {total}"),
                    }
                })?;
                self.approver.clone_from(&approver.id);
                Ok(vec![RequisitionField::Approver.key()])
            }
        }
    }

    fn derive(&self, reference: &ReferenceData) -> RequisitionTotals {
        let line_totals: Vec<LineTotal> = self
            .items
            .iter()
            .map(|item| LineTotal {
                id: item.id.clone(),
                total: item.total(),
            })
            .collect();
        let estimated_total: f64 = line_totals.iter().map(|line| line.total).sum();

        RequisitionTotals {
            line_totals,
            estimated_total,
            budget_remaining: self
                .budget_available
                .map(|available| available - estimated_total),
            suggested_approver: reference
                .suggested_approver(estimated_total)
                .map(|approver| approver.id.clone()),
            completion: self.completion(),
        }
    }

    fn acknowledged(&self) -> bool {
        self.terms_accepted
    }

    fn completion(&self) -> u8 {
        let tracked: [bool; TRACKED_FIELD_COUNT] = [
            !is_blank(&self.department),
            !is_blank(&self.requested_by),
            !is_blank(&self.requested_by_email),
            !is_blank(&self.purpose),
            !self.items.is_empty(),
            !is_blank(&self.delivery_date),
            !is_blank(&self.delivery_location),
            !is_blank(&self.budget_code),
            !is_blank(&self.approver),
            !is_blank(&self.justification),
            self.terms_accepted,
        ];
        let filled: usize = tracked.iter().filter(|present| **present).count();
        completion_percent(filled, TRACKED_FIELD_COUNT)
    }
}

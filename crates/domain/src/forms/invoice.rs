// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Finance sales invoice, four steps.

use crate::error::DomainError;
use crate::form::{FormSchema, Keyed, StepRule, item_not_found, keyed_enum};
use crate::reference::{Customer, ReferenceData};
use crate::totals::{
    DiscountType, DocumentTotals, LineTotal, TaxedLine, completion_percent, document_totals,
    line_total,
};
use crate::types::{
    FieldKey, FieldValue, FormKind, ItemList, LocalId, LocalItem, StepDefinition,
    ValidationErrors,
};
use crate::validation::{is_blank, parse_iso_date, require_date, require_text};
use serde::{Deserialize, Serialize};
use time::Date;

const LINE_PREFIX: &str = "line";
const DEFAULT_TAX_RATE: f64 = 18.0;
const TRACKED_FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStep {
    Customer,
    Items,
    Addresses,
    Review,
}

const STEPS: &[StepDefinition<InvoiceStep>] = &[
    StepDefinition {
        id: InvoiceStep::Customer,
        label: "Customer",
        description: "Who is billed",
    },
    StepDefinition {
        id: InvoiceStep::Items,
        label: "Line Items",
        description: "Goods and services",
    },
    StepDefinition {
        id: InvoiceStep::Addresses,
        label: "Addresses",
        description: "Billing & shipping",
    },
    StepDefinition {
        id: InvoiceStep::Review,
        label: "Review",
        description: "Confirm totals",
    },
];

keyed_enum! {
    pub enum InvoiceField in "invoice", unknown = UnknownField {
        InvoiceNumber => "invoiceNumber",
        Customer => "customer",
        CustomerGst => "customerGst",
        InvoiceDate => "invoiceDate",
        DueDate => "dueDate",
        PoReference => "poReference",
        PaymentTerms => "paymentTerms",
        BillingStreet => "billingAddress.street",
        BillingCity => "billingAddress.city",
        BillingState => "billingAddress.state",
        BillingPincode => "billingAddress.pincode",
        ShippingStreet => "shippingAddress.street",
        ShippingCity => "shippingAddress.city",
        ShippingState => "shippingAddress.state",
        ShippingPincode => "shippingAddress.pincode",
        DiscountType => "discountType",
        DiscountValue => "discountValue",
        Notes => "notes",
        TermsConditions => "termsConditions",
        TermsAccepted => "termsAccepted",
    }
}

keyed_enum! {
    pub enum InvoiceCollection in "invoice", unknown = UnknownCollection {
        LineItems => "lineItems",
    }
}

keyed_enum! {
    pub enum InvoiceLineField in "invoice", unknown = UnknownField {
        Item => "item",
        Description => "description",
        Hsn => "hsn",
        Quantity => "quantity",
        UnitPrice => "unitPrice",
        TaxRate => "taxRate",
    }
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    /// Tax jurisdiction.
    pub state: String,
    pub pincode: String,
}

/// One invoiced line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub id: LocalId,
    pub item: String,
    pub description: String,
    /// Harmonized classification code.
    pub hsn: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub tax_rate: f64,
}

impl InvoiceLine {
    fn blank(id: LocalId) -> Self {
        Self {
            id,
            item: String::new(),
            description: String::new(),
            hsn: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    const fn taxed(&self) -> TaxedLine {
        TaxedLine {
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_rate: self.tax_rate,
        }
    }

    fn is_billable(&self) -> bool {
        !is_blank(&self.item) && self.unit_price > 0.0
    }
}

impl LocalItem for InvoiceLine {
    fn local_id(&self) -> &LocalId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InvoiceOperation {
    /// Fills the customer name, GSTIN and address states from the directory.
    SelectCustomer { id: String },
    /// Copies every billing address field to the shipping address.
    CopyBillingToShipping,
}

/// Derived invoice values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Tax-inclusive line totals.
    pub line_totals: Vec<LineTotal>,
    #[serde(flatten)]
    pub totals: DocumentTotals,
    pub completion: u8,
}

/// An invoice being authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub invoice_number: String,
    pub customer: String,
    pub customer_gst: String,
    pub invoice_date: String,
    pub due_date: String,
    pub po_reference: String,
    pub payment_terms: String,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub line_items: ItemList<InvoiceLine>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub notes: String,
    pub terms_conditions: String,
    pub terms_accepted: bool,
}

impl Default for Invoice {
    fn default() -> Self {
        let mut line_items: ItemList<InvoiceLine> = ItemList::new();
        line_items.push_with(LINE_PREFIX, InvoiceLine::blank);
        Self {
            invoice_number: String::new(),
            customer: String::new(),
            customer_gst: String::new(),
            invoice_date: String::new(),
            due_date: String::new(),
            po_reference: String::new(),
            payment_terms: String::from("Net 30"),
            billing_address: Address::default(),
            shipping_address: Address::default(),
            line_items,
            discount_type: DiscountType::Amount,
            discount_value: 0.0,
            notes: String::new(),
            terms_conditions: String::new(),
            terms_accepted: false,
        }
    }
}

fn check_customer(form: &Invoice, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        InvoiceField::Customer.key(),
        &form.customer,
        "Customer required",
    );
    let key: FieldKey = InvoiceField::DueDate.key();
    let Some(due) = require_date(errors, key, &form.due_date, "Due date required") else {
        return;
    };
    let issued: Option<Date> = parse_iso_date(&form.invoice_date);
    if issued.is_some_and(|issued| due < issued) {
        errors.insert(key, "Due date cannot be before the invoice date");
    }
}

fn check_lines(form: &Invoice, _: &ReferenceData, errors: &mut ValidationErrors) {
    if !form.line_items.iter().any(InvoiceLine::is_billable) {
        errors.insert(
            InvoiceCollection::LineItems.key(),
            "Add at least one item with a price",
        );
    }
}

fn check_billing_address(form: &Invoice, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        InvoiceField::BillingStreet.key(),
        &form.billing_address.street,
        "Street address required",
    );
    require_text(
        errors,
        InvoiceField::BillingCity.key(),
        &form.billing_address.city,
        "City required",
    );
}

fn check_terms(form: &Invoice, _: &ReferenceData, errors: &mut ValidationErrors) {
    if !form.terms_accepted {
        errors.insert(InvoiceField::TermsAccepted.key(), "Accept terms to proceed");
    }
}

const CUSTOMER_RULES: &[StepRule<Invoice>] = &[check_customer];
const ITEMS_RULES: &[StepRule<Invoice>] = &[check_lines];
const ADDRESSES_RULES: &[StepRule<Invoice>] = &[check_billing_address];
const REVIEW_RULES: &[StepRule<Invoice>] = &[check_terms];

impl FormSchema for Invoice {
    type Field = InvoiceField;
    type Collection = InvoiceCollection;
    type ItemField = InvoiceLineField;
    type Step = InvoiceStep;
    type Operation = InvoiceOperation;
    type Derived = InvoiceTotals;

    const KIND: FormKind = FormKind::Invoice;

    fn steps() -> &'static [StepDefinition<InvoiceStep>] {
        STEPS
    }

    fn rules(step: InvoiceStep) -> &'static [StepRule<Self>] {
        match step {
            InvoiceStep::Customer => CUSTOMER_RULES,
            InvoiceStep::Items => ITEMS_RULES,
            InvoiceStep::Addresses => ADDRESSES_RULES,
            InvoiceStep::Review => REVIEW_RULES,
        }
    }

    fn set_field(&mut self, field: InvoiceField, value: FieldValue) -> Result<(), DomainError> {
        let key: FieldKey = field.key();
        match field {
            InvoiceField::InvoiceNumber => self.invoice_number = value.into_text(key)?,
            InvoiceField::Customer => self.customer = value.into_text(key)?,
            InvoiceField::CustomerGst => self.customer_gst = value.into_text(key)?,
            InvoiceField::InvoiceDate => self.invoice_date = value.into_text(key)?,
            InvoiceField::DueDate => self.due_date = value.into_text(key)?,
            InvoiceField::PoReference => self.po_reference = value.into_text(key)?,
            InvoiceField::PaymentTerms => self.payment_terms = value.into_text(key)?,
            InvoiceField::BillingStreet => self.billing_address.street = value.into_text(key)?,
            InvoiceField::BillingCity => self.billing_address.city = value.into_text(key)?,
            InvoiceField::BillingState => self.billing_address.state = value.into_text(key)?,
            InvoiceField::BillingPincode => self.billing_address.pincode = value.into_text(key)?,
            InvoiceField::ShippingStreet => self.shipping_address.street = value.into_text(key)?,
            InvoiceField::ShippingCity => self.shipping_address.city = value.into_text(key)?,
            InvoiceField::ShippingState => self.shipping_address.state = value.into_text(key)?,
            InvoiceField::ShippingPincode => {
                self.shipping_address.pincode = value.into_text(key)?;
            }
            InvoiceField::DiscountType => self.discount_type = value.into_choice(key)?,
            InvoiceField::DiscountValue => self.discount_value = value.into_number(key)?,
            InvoiceField::Notes => self.notes = value.into_text(key)?,
            InvoiceField::TermsConditions => self.terms_conditions = value.into_text(key)?,
            InvoiceField::TermsAccepted => self.terms_accepted = value.into_flag(key)?,
        }
        Ok(())
    }

    fn add_item(&mut self, collection: InvoiceCollection) -> LocalId {
        match collection {
            InvoiceCollection::LineItems => self.line_items.push_with(LINE_PREFIX, InvoiceLine::blank),
        }
    }

    fn update_item(
        &mut self,
        collection: InvoiceCollection,
        id: &LocalId,
        field: InvoiceLineField,
        value: FieldValue,
    ) -> Result<(), DomainError> {
        let InvoiceCollection::LineItems = collection;
        let line: &mut InvoiceLine = self
            .line_items
            .get_mut(id)
            .ok_or_else(|| item_not_found(collection.key(), id))?;
        let key: FieldKey = field.key();
        match field {
            InvoiceLineField::Item => line.item = value.into_text(key)?,
            InvoiceLineField::Description => line.description = value.into_text(key)?,
            InvoiceLineField::Hsn => line.hsn = value.into_text(key)?,
            InvoiceLineField::Quantity => line.quantity = value.into_number(key)?,
            InvoiceLineField::UnitPrice => line.unit_price = value.into_number(key)?,
            InvoiceLineField::TaxRate => line.tax_rate = value.into_number(key)?,
        }
        Ok(())
    }

    fn remove_item(&mut self, collection: InvoiceCollection, id: &LocalId) -> Result<(), DomainError> {
        let InvoiceCollection::LineItems = collection;
        if self.line_items.get(id).is_none() {
            return Err(item_not_found(collection.key(), id));
        }
        if self.line_items.len() == 1 {
            return Err(DomainError::LastItemRemoval {
                collection: collection.key(),
            });
        }
        self.line_items.remove(id);
        Ok(())
    }

    fn apply_operation(
        &mut self,
        operation: &InvoiceOperation,
        reference: &ReferenceData,
    ) -> Result<Vec<FieldKey>, DomainError> {
        match operation {
            InvoiceOperation::SelectCustomer { id } => {
                let customer: &Customer =
                    reference
                        .customer(id)
                        .ok_or_else(|| DomainError::ReferenceNotFound {
                            kind: "customer",
                            key: id.clone(),
                        })?;
                self.customer.clone_from(&customer.name);
                self.customer_gst.clone_from(&customer.gstin);
                self.billing_address.state.clone_from(&customer.billing_state);
                self.shipping_address.state.clone_from(&customer.shipping_state);
                Ok(vec![
                    InvoiceField::Customer.key(),
                    InvoiceField::CustomerGst.key(),
                    InvoiceField::BillingState.key(),
                    InvoiceField::ShippingState.key(),
                ])
            }
            InvoiceOperation::CopyBillingToShipping => {
                self.shipping_address = self.billing_address.clone();
                Ok(vec![
                    InvoiceField::ShippingStreet.key(),
                    InvoiceField::ShippingCity.key(),
                    InvoiceField::ShippingState.key(),
                    InvoiceField::ShippingPincode.key(),
                ])
            }
        }
    }

    /// Both addresses start in the seller's state.
    fn blank(reference: &ReferenceData) -> Self {
        let mut form: Self = Self::default();
        form.billing_address.state.clone_from(&reference.seller_state);
        form.shipping_address.state.clone_from(&reference.seller_state);
        form
    }

    fn derive(&self, reference: &ReferenceData) -> InvoiceTotals {
        let taxed: Vec<TaxedLine> = self.line_items.iter().map(InvoiceLine::taxed).collect();
        let line_totals: Vec<LineTotal> = self
            .line_items
            .iter()
            .map(|line| LineTotal {
                id: line.id.clone(),
                total: line_total(line.quantity, line.unit_price, line.tax_rate),
            })
            .collect();

        InvoiceTotals {
            line_totals,
            totals: document_totals(
                &taxed,
                self.discount_type,
                self.discount_value,
                &self.billing_address.state,
                &reference.seller_state,
            ),
            completion: self.completion(),
        }
    }

    fn acknowledged(&self) -> bool {
        self.terms_accepted
    }

    fn completion(&self) -> u8 {
        let tracked: [bool; TRACKED_FIELD_COUNT] = [
            !is_blank(&self.customer),
            !is_blank(&self.due_date),
            self.line_items.iter().any(InvoiceLine::is_billable),
            !is_blank(&self.billing_address.street),
            !is_blank(&self.billing_address.city),
            self.terms_accepted,
        ];
        let filled: usize = tracked.iter().filter(|present| **present).count();
        completion_percent(filled, TRACKED_FIELD_COUNT)
    }
}

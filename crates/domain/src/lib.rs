// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod form;
pub mod forms;
mod reference;
mod totals;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use form::{FormSchema, Keyed, StepRule};
pub use forms::inspection::{
    ChecklistItem, Defect, InspectionCollection, InspectionField, InspectionItemField,
    InspectionOperation, InspectionPriority, InspectionStep, InspectionSummary, InspectionType,
    QualityInspection, Severity,
};
pub use forms::invoice::{
    Address, Invoice, InvoiceCollection, InvoiceField, InvoiceLine, InvoiceLineField,
    InvoiceOperation, InvoiceStep, InvoiceTotals,
};
pub use forms::project::{
    Deliverable, Project, ProjectCollection, ProjectField, ProjectItemField, ProjectOperation,
    ProjectStep, ProjectSummary, TeamMember,
};
pub use forms::requisition::{
    PurchaseRequisition, RequisitionCollection, RequisitionField, RequisitionItem,
    RequisitionItemField, RequisitionOperation, RequisitionStep, RequisitionTotals,
};
pub use reference::{Approver, CatalogItem, Customer, DeliveryLocation, ReferenceData};
pub use totals::{
    DiscountType, DocumentTotals, LineTotal, ProfitMargin, TaxBreakdown, TaxedLine,
    completion_percent, discount_amount, document_totals, line_subtotal, line_tax, line_total,
    percent_of, profit_margin,
};
pub use types::{
    FieldKey, FieldValue, FormKind, ItemList, LocalId, LocalItem, Priority, StepDefinition,
    ValidationErrors,
};
pub use validation::{is_blank, is_valid_email, parse_iso_date};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Approver, CatalogItem, Customer, DeliveryLocation, DomainError, FieldValue, FormSchema,
    Invoice, InvoiceCollection, InvoiceField, InvoiceLineField, InvoiceOperation, InvoiceTotals,
    LocalId, Project, ProjectCollection, ProjectField, ProjectItemField, ProjectSummary,
    PurchaseRequisition, QualityInspection, ReferenceData, RequisitionCollection,
    RequisitionField, RequisitionItemField, RequisitionOperation, RequisitionTotals, Severity,
    TaxBreakdown, ValidationErrors,
};
use crate::{InspectionCollection, InspectionField, InspectionItemField, InspectionOperation};

fn create_test_reference() -> ReferenceData {
    ReferenceData {
        approvers: vec![
            Approver {
                id: String::from("1"),
                name: String::from("Amit Sharma"),
                role: String::from("Department Head"),
                approval_limit: 500_000.0,
            },
            Approver {
                id: String::from("2"),
                name: String::from("Priya Patel"),
                role: String::from("Finance Manager"),
                approval_limit: 1_000_000.0,
            },
        ],
        delivery_locations: vec![DeliveryLocation {
            code: String::from("warehouse-main"),
            name: String::from("Main Warehouse"),
            address: String::from("123 Industrial Ave, Sector 5"),
        }],
        catalog: vec![CatalogItem {
            code: String::from("STL-001"),
            name: String::from("Stainless Steel Sheet"),
            description: String::from("SS304 Grade"),
            category: String::from("Raw Materials"),
            unit: String::from("Kg"),
            unit_price: 850.0,
        }],
        customers: vec![Customer {
            id: String::from("CUST-001"),
            name: String::from("Taj Hotels Limited"),
            gstin: String::from("27AAACT1234A1Z5"),
            billing_state: String::from("Maharashtra"),
            shipping_state: String::from("Goa"),
        }],
        inspectors: vec![String::from("Rahul Verma")],
        seller_state: String::from("Maharashtra"),
    }
}

fn text(value: &str) -> FieldValue {
    FieldValue::text(value)
}

// Purchase requisition

#[test]
fn test_requisition_basic_info_reports_each_missing_field() {
    let form: PurchaseRequisition = PurchaseRequisition::default();
    let errors: ValidationErrors = form.validate_step(0, &ReferenceData::default());

    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        vec!["department", "purpose", "requestedBy", "requestedByEmail"]
    );
    assert_eq!(errors.get("requestedByEmail"), Some("Email required"));
}

#[test]
fn test_requisition_rejects_malformed_email() {
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    form.set_field(RequisitionField::Department, text("IT")).unwrap();
    form.set_field(RequisitionField::RequestedBy, text("Asha")).unwrap();
    form.set_field(RequisitionField::RequestedByEmail, text("asha@plant"))
        .unwrap();
    form.set_field(RequisitionField::Purpose, text("Replacement laptops"))
        .unwrap();

    let errors: ValidationErrors = form.validate_step(0, &ReferenceData::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("requestedByEmail"), Some("Invalid email"));
}

#[test]
fn test_requisition_items_step_uses_collection_key() {
    let form: PurchaseRequisition = PurchaseRequisition::default();
    let errors: ValidationErrors = form.validate_step(1, &ReferenceData::default());
    assert_eq!(errors.get("items"), Some("Add at least one item"));
}

#[test]
fn test_requisition_delivery_location_checked_against_catalogue() {
    let reference: ReferenceData = create_test_reference();
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    form.set_field(RequisitionField::DeliveryDate, text("2026-05-01"))
        .unwrap();
    form.set_field(RequisitionField::DeliveryLocation, text("roof"))
        .unwrap();

    let errors: ValidationErrors = form.validate_step(2, &reference);
    assert_eq!(errors.get("deliveryLocation"), Some("Unknown delivery location"));

    let errors: ValidationErrors = form.validate_step(2, &ReferenceData::default());
    assert!(errors.is_empty());
}

#[test]
fn test_requisition_catalogue_operations_fill_fields() {
    let reference: ReferenceData = create_test_reference();
    let mut form: PurchaseRequisition = PurchaseRequisition::default();

    let touched = form
        .apply_operation(
            &RequisitionOperation::AddCatalogItem {
                code: String::from("STL-001"),
                quantity: 10.0,
            },
            &reference,
        )
        .unwrap();
    assert_eq!(touched, vec!["items"]);
    assert_eq!(form.items.len(), 1);
    assert_eq!(form.estimated_total(), 8500.0);

    form.apply_operation(
        &RequisitionOperation::ChooseDeliveryLocation {
            code: String::from("warehouse-main"),
        },
        &reference,
    )
    .unwrap();
    assert_eq!(form.delivery_address, "123 Industrial Ave, Sector 5");

    form.apply_operation(&RequisitionOperation::ApplySuggestedApprover, &reference)
        .unwrap();
    assert_eq!(form.approver, "1");
}

#[test]
fn test_requisition_unknown_catalogue_item_is_an_error() {
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    let result = form.apply_operation(
        &RequisitionOperation::AddCatalogItem {
            code: String::from("NOPE"),
            quantity: 1.0,
        },
        &create_test_reference(),
    );
    assert!(matches!(
        result,
        Err(DomainError::ReferenceNotFound {
            kind: "catalog item",
            ..
        })
    ));
    assert!(form.items.is_empty());
}

#[test]
fn test_requisition_derived_totals() {
    let reference: ReferenceData = create_test_reference();
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    let id: LocalId = form.add_item(RequisitionCollection::Items);
    form.update_item(
        RequisitionCollection::Items,
        &id,
        RequisitionItemField::Quantity,
        FieldValue::Number(4.0),
    )
    .unwrap();
    form.update_item(
        RequisitionCollection::Items,
        &id,
        RequisitionItemField::EstimatedPrice,
        FieldValue::Number(200_000.0),
    )
    .unwrap();
    form.set_field(RequisitionField::BudgetAvailable, FieldValue::Number(1_000_000.0))
        .unwrap();

    let totals: RequisitionTotals = form.derive(&reference);
    assert_eq!(totals.estimated_total, 800_000.0);
    assert_eq!(totals.line_totals[0].total, 800_000.0);
    assert_eq!(totals.budget_remaining, Some(200_000.0));
    assert_eq!(totals.suggested_approver.as_deref(), Some("2"));
}

#[test]
fn test_derived_totals_are_idempotent() {
    let reference: ReferenceData = create_test_reference();
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    form.apply_operation(
        &RequisitionOperation::AddCatalogItem {
            code: String::from("STL-001"),
            quantity: 3.0,
        },
        &reference,
    )
    .unwrap();
    let snapshot: PurchaseRequisition = form.clone();

    let first: RequisitionTotals = form.derive(&reference);
    let second: RequisitionTotals = form.derive(&reference);

    assert_eq!(first, second);
    assert_eq!(form, snapshot);
}

#[test]
fn test_requisition_completion_counts_tracked_fields() {
    let mut form: PurchaseRequisition = PurchaseRequisition::default();
    assert_eq!(form.completion(), 0);
    form.set_field(RequisitionField::Department, text("IT")).unwrap();
    assert_eq!(form.completion(), 9);
    form.set_field(RequisitionField::TermsAccepted, FieldValue::Flag(true))
        .unwrap();
    assert_eq!(form.completion(), 18);
}

// Invoice

#[test]
fn test_invoice_starts_with_one_line_that_cannot_be_removed() {
    let mut form: Invoice = Invoice::default();
    assert_eq!(form.line_items.len(), 1);
    let only: LocalId = form.line_items.iter().next().unwrap().id.clone();

    let result: Result<(), DomainError> = form.remove_item(InvoiceCollection::LineItems, &only);
    assert_eq!(
        result,
        Err(DomainError::LastItemRemoval {
            collection: "lineItems"
        })
    );

    form.add_item(InvoiceCollection::LineItems);
    form.remove_item(InvoiceCollection::LineItems, &only).unwrap();
    assert_eq!(form.line_items.len(), 1);
}

#[test]
fn test_invoice_line_rule_needs_item_and_price() {
    let mut form: Invoice = Invoice::default();
    let id: LocalId = form.line_items.iter().next().unwrap().id.clone();
    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::Item,
        text("Installation"),
    )
    .unwrap();

    let errors: ValidationErrors = form.validate_step(1, &ReferenceData::default());
    assert!(errors.contains("lineItems"));

    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::UnitPrice,
        FieldValue::Number(500.0),
    )
    .unwrap();
    let errors: ValidationErrors = form.validate_step(1, &ReferenceData::default());
    assert!(errors.is_empty());
}

#[test]
fn test_invoice_due_date_cannot_precede_invoice_date() {
    let mut form: Invoice = Invoice::default();
    form.set_field(InvoiceField::Customer, text("Oberoi Group")).unwrap();
    form.set_field(InvoiceField::InvoiceDate, text("2026-04-10")).unwrap();
    form.set_field(InvoiceField::DueDate, text("2026-04-01")).unwrap();

    let errors: ValidationErrors = form.validate_step(0, &ReferenceData::default());
    assert_eq!(
        errors.get("dueDate"),
        Some("Due date cannot be before the invoice date")
    );
}

#[test]
fn test_invoice_addresses_use_dotted_keys() {
    let form: Invoice = Invoice::default();
    let errors: ValidationErrors = form.validate_step(2, &ReferenceData::default());
    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        vec!["billingAddress.city", "billingAddress.street"]
    );
}

#[test]
fn test_invoice_tax_split_follows_billing_state() {
    let reference: ReferenceData = create_test_reference();
    let mut form: Invoice = Invoice::default();
    let id: LocalId = form.line_items.iter().next().unwrap().id.clone();
    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::Quantity,
        FieldValue::Number(10.0),
    )
    .unwrap();
    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::UnitPrice,
        FieldValue::Number(100.0),
    )
    .unwrap();

    form.set_field(InvoiceField::BillingState, text("Maharashtra"))
        .unwrap();
    let totals: InvoiceTotals = form.derive(&reference);
    assert_eq!(totals.totals.tax_amount, 180.0);
    assert_eq!(
        totals.totals.tax,
        TaxBreakdown::IntraState {
            cgst: 90.0,
            sgst: 90.0
        }
    );

    form.set_field(InvoiceField::BillingState, text("Karnataka"))
        .unwrap();
    let totals: InvoiceTotals = form.derive(&reference);
    assert_eq!(totals.totals.tax, TaxBreakdown::InterState { igst: 180.0 });
}

#[test]
fn test_blank_invoice_starts_in_seller_state() {
    let reference: ReferenceData = create_test_reference();
    let mut form: Invoice = Invoice::blank(&reference);

    assert_eq!(form.billing_address.state, "Maharashtra");
    assert_eq!(form.shipping_address.state, "Maharashtra");

    let id: LocalId = form.line_items.iter().next().unwrap().id.clone();
    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::UnitPrice,
        FieldValue::Number(100.0),
    )
    .unwrap();
    let totals: InvoiceTotals = form.derive(&reference);
    assert_eq!(
        totals.totals.tax,
        TaxBreakdown::IntraState {
            cgst: 9.0,
            sgst: 9.0
        }
    );
}

#[test]
fn test_invoice_percentage_discount() {
    let mut form: Invoice = Invoice::default();
    let id: LocalId = form.line_items.iter().next().unwrap().id.clone();
    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::Quantity,
        FieldValue::Number(10.0),
    )
    .unwrap();
    form.update_item(
        InvoiceCollection::LineItems,
        &id,
        InvoiceLineField::UnitPrice,
        FieldValue::Number(100.0),
    )
    .unwrap();
    form.set_field(InvoiceField::DiscountType, text("percentage"))
        .unwrap();
    form.set_field(InvoiceField::DiscountValue, FieldValue::Number(10.0))
        .unwrap();

    let totals: InvoiceTotals = form.derive(&ReferenceData::default());
    assert_eq!(totals.totals.subtotal, 1000.0);
    assert_eq!(totals.totals.discount, 100.0);
    assert_eq!(totals.totals.grand_total, 1000.0 + 180.0 - 100.0);
}

#[test]
fn test_invoice_select_customer_and_copy_address() {
    let reference: ReferenceData = create_test_reference();
    let mut form: Invoice = Invoice::default();
    form.apply_operation(
        &InvoiceOperation::SelectCustomer {
            id: String::from("CUST-001"),
        },
        &reference,
    )
    .unwrap();
    assert_eq!(form.customer, "Taj Hotels Limited");
    assert_eq!(form.billing_address.state, "Maharashtra");
    assert_eq!(form.shipping_address.state, "Goa");

    form.set_field(InvoiceField::BillingStreet, text("Apollo Bunder"))
        .unwrap();
    form.set_field(InvoiceField::BillingCity, text("Mumbai")).unwrap();
    let touched = form
        .apply_operation(&InvoiceOperation::CopyBillingToShipping, &reference)
        .unwrap();
    assert_eq!(form.shipping_address, form.billing_address);
    assert!(touched.contains(&"shippingAddress.city"));
}

#[test]
fn test_invoice_rejects_unknown_discount_type() {
    let mut form: Invoice = Invoice::default();
    let result: Result<(), DomainError> =
        form.set_field(InvoiceField::DiscountType, text("coupon"));
    assert!(matches!(result, Err(DomainError::InvalidFieldValue { .. })));
}

// Project

#[test]
fn test_project_starts_with_one_member_and_one_deliverable() {
    let form: Project = Project::default();
    assert_eq!(form.team_members.len(), 1);
    assert_eq!(form.deliverables.len(), 1);
    let member = form.team_members.iter().next().unwrap();
    assert_eq!(member.role, "Project Manager");
    assert_eq!(member.allocation, 100.0);
}

#[test]
fn test_project_end_date_must_follow_start_date() {
    let mut form: Project = Project::default();
    form.set_field(ProjectField::StartDate, text("2026-06-01")).unwrap();
    form.set_field(ProjectField::EndDate, text("2026-06-01")).unwrap();
    form.set_field(ProjectField::EstimatedBudget, text("1000")).unwrap();
    form.set_field(ProjectField::ContractValue, text("1500")).unwrap();

    let errors: ValidationErrors = form.validate_step(1, &ReferenceData::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("endDate"),
        Some("End date must be after start date")
    );
}

#[test]
fn test_project_scope_step_has_no_rules() {
    let form: Project = Project::default();
    assert!(form.validate_step(4, &ReferenceData::default()).is_empty());
}

#[test]
fn test_project_allocation_must_be_in_range() {
    let mut form: Project = Project::default();
    form.set_field(ProjectField::ProjectManager, text("Priya Sharma"))
        .unwrap();
    let id: LocalId = form.add_item(ProjectCollection::TeamMembers);
    form.update_item(
        ProjectCollection::TeamMembers,
        &id,
        ProjectItemField::Allocation,
        FieldValue::Number(120.0),
    )
    .unwrap();

    let errors: ValidationErrors = form.validate_step(2, &ReferenceData::default());
    assert!(errors.contains("teamMembers"));
}

#[test]
fn test_project_item_field_must_match_collection() {
    let mut form: Project = Project::default();
    let id: LocalId = form.team_members.iter().next().unwrap().id.clone();
    let result: Result<(), DomainError> = form.update_item(
        ProjectCollection::TeamMembers,
        &id,
        ProjectItemField::PlannedDate,
        text("2026-07-01"),
    );
    assert_eq!(
        result,
        Err(DomainError::FieldNotInCollection {
            collection: "teamMembers",
            field: String::from("plannedDate"),
        })
    );
}

#[test]
fn test_project_summary_margin_and_duration() {
    let mut form: Project = Project::default();
    form.set_field(ProjectField::StartDate, text("2026-01-01")).unwrap();
    form.set_field(ProjectField::EndDate, text("2026-01-31")).unwrap();
    form.set_field(ProjectField::EstimatedBudget, FieldValue::Number(150.0))
        .unwrap();
    form.set_field(ProjectField::ContractValue, FieldValue::Number(200.0))
        .unwrap();

    let summary: ProjectSummary = form.derive(&ReferenceData::default());
    assert_eq!(summary.duration_days, Some(30));
    let margin = summary.margin.unwrap();
    assert_eq!(margin.profit, 50.0);
    assert_eq!(margin.margin_percent, 25.0);
}

#[test]
fn test_project_margin_hidden_without_budget() {
    let mut form: Project = Project::default();
    form.set_field(ProjectField::ContractValue, FieldValue::Number(200.0))
        .unwrap();
    let summary: ProjectSummary = form.derive(&ReferenceData::default());
    assert!(summary.margin.is_none());
    assert!(summary.duration_days.is_none());
}

#[test]
fn test_project_completion_over_ten_tracked_fields() {
    let mut form: Project = Project::default();
    form.set_field(ProjectField::ProjectType, text("")).unwrap();
    assert_eq!(form.completion(), 0);

    for (field, value) in [
        (ProjectField::ProjectName, "Kitchen fit-out"),
        (ProjectField::ProjectType, "Commercial Kitchen"),
        (ProjectField::SalesOrderNumber, "SO-2024-001"),
        (ProjectField::CustomerName, "Taj Hotels Limited"),
        (ProjectField::Location, "Mumbai"),
    ] {
        form.set_field(field, text(value)).unwrap();
    }
    assert_eq!(form.completion(), 50);

    for (field, value) in [
        (ProjectField::StartDate, "2026-01-01"),
        (ProjectField::EndDate, "2026-03-01"),
        (ProjectField::EstimatedBudget, "100"),
        (ProjectField::ContractValue, "150"),
        (ProjectField::ProjectManager, "Rajesh Kumar"),
    ] {
        form.set_field(field, text(value)).unwrap();
    }
    assert_eq!(form.completion(), 100);
}

// Quality inspection

#[test]
fn test_inspection_sample_cannot_exceed_lot() {
    let mut form: QualityInspection = QualityInspection::default();
    form.set_field(InspectionField::ItemCode, text("RM-STL-001"))
        .unwrap();
    form.set_field(InspectionField::LotQuantity, FieldValue::Number(50.0))
        .unwrap();
    form.set_field(InspectionField::SampleSize, FieldValue::Number(80.0))
        .unwrap();

    let errors: ValidationErrors = form.validate_step(1, &ReferenceData::default());
    assert_eq!(
        errors.get("sampleSize"),
        Some("Sample size cannot exceed lot quantity")
    );
}

#[test]
fn test_inspection_inspector_checked_when_list_loaded() {
    let reference: ReferenceData = create_test_reference();
    let mut form: QualityInspection = QualityInspection::default();
    form.set_field(InspectionField::ScheduledDate, text("2026-02-14"))
        .unwrap();
    form.set_field(InspectionField::AssignedTo, text("Someone Else"))
        .unwrap();

    let errors: ValidationErrors = form.validate_step(2, &reference);
    assert_eq!(errors.get("assignedTo"), Some("Unknown inspector"));
}

#[test]
fn test_inspection_standard_checklist_follows_type() {
    let mut form: QualityInspection = QualityInspection::default();
    form.set_field(InspectionField::InspectionType, text("final"))
        .unwrap();
    form.apply_operation(
        &InspectionOperation::LoadStandardChecklist,
        &ReferenceData::default(),
    )
    .unwrap();

    assert_eq!(form.checklist.len(), 4);
    assert!(form.validate_step(3, &ReferenceData::default()).is_empty());
}

#[test]
fn test_inspection_summary_counts_defects() {
    let mut form: QualityInspection = QualityInspection::default();
    form.set_field(InspectionField::LotQuantity, FieldValue::Number(200.0))
        .unwrap();
    form.set_field(InspectionField::SampleSize, FieldValue::Number(20.0))
        .unwrap();
    let first: LocalId = form.add_item(InspectionCollection::Defects);
    form.update_item(
        InspectionCollection::Defects,
        &first,
        InspectionItemField::Quantity,
        FieldValue::Number(2.0),
    )
    .unwrap();
    form.update_item(
        InspectionCollection::Defects,
        &first,
        InspectionItemField::Severity,
        text("critical"),
    )
    .unwrap();
    form.add_item(InspectionCollection::Defects);

    let summary = form.derive(&ReferenceData::default());
    assert_eq!(summary.sample_ratio, Some(10.0));
    assert_eq!(summary.defect_quantity, 3);
    assert_eq!(summary.defect_rate, Some(15.0));
    assert_eq!(summary.critical_defects, 1);
    assert_eq!(
        form.defects.get(&first).unwrap().severity,
        Severity::Critical
    );
}

#[test]
fn test_inspection_select_item_from_catalogue() {
    let mut form: QualityInspection = QualityInspection::default();
    let touched = form
        .apply_operation(
            &InspectionOperation::SelectItem {
                code: String::from("STL-001"),
            },
            &create_test_reference(),
        )
        .unwrap();
    assert_eq!(form.item_name, "Stainless Steel Sheet");
    assert_eq!(touched.len(), 3);
}

#[test]
fn test_field_keys_parse_from_strings() {
    let field: InvoiceField = "billingAddress.city".parse().unwrap();
    assert_eq!(field, InvoiceField::BillingCity);

    let result: Result<InvoiceField, DomainError> = "billingAddress.country".parse();
    assert_eq!(
        result,
        Err(DomainError::UnknownField {
            form: "invoice",
            key: String::from("billingAddress.country"),
        })
    );

    let result: Result<RequisitionCollection, DomainError> = "lines".parse();
    assert!(matches!(result, Err(DomainError::UnknownCollection { .. })));
}

#[test]
fn test_step_tables_match_wizard_lengths() {
    assert_eq!(PurchaseRequisition::step_count(), 5);
    assert_eq!(Invoice::step_count(), 4);
    assert_eq!(Project::step_count(), 6);
    assert_eq!(QualityInspection::step_count(), 5);
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Quality inspection scheduling, five steps.

use crate::error::DomainError;
use crate::form::{FormSchema, Keyed, StepRule, item_not_found, keyed_enum, not_in_collection};
use crate::reference::{CatalogItem, ReferenceData};
use crate::totals::{completion_percent, percent_of};
use crate::types::{
    FieldKey, FieldValue, FormKind, ItemList, LocalId, LocalItem, StepDefinition,
    ValidationErrors,
};
use crate::validation::{is_blank, require_date, require_text};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const CHECK_PREFIX: &str = "check";
const DEFECT_PREFIX: &str = "defect";
const TRACKED_FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionStep {
    Details,
    Item,
    Schedule,
    Checklist,
    Review,
}

const STEPS: &[StepDefinition<InspectionStep>] = &[
    StepDefinition {
        id: InspectionStep::Details,
        label: "Basic Info",
        description: "Type & priority",
    },
    StepDefinition {
        id: InspectionStep::Item,
        label: "Item",
        description: "What to inspect",
    },
    StepDefinition {
        id: InspectionStep::Schedule,
        label: "Schedule",
        description: "When & who",
    },
    StepDefinition {
        id: InspectionStep::Checklist,
        label: "Checklist",
        description: "Parameters",
    },
    StepDefinition {
        id: InspectionStep::Review,
        label: "Review",
        description: "Submit",
    },
];

/// When in the material flow the inspection happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionType {
    #[default]
    Incoming,
    InProcess,
    Final,
    PreShipment,
}

impl FromStr for InspectionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(Self::Incoming),
            "in-process" => Ok(Self::InProcess),
            "final" => Ok(Self::Final),
            "pre-shipment" => Ok(Self::PreShipment),
            other => Err(DomainError::InvalidFieldValue {
                field: String::from("inspectionType"),
                reason: format!("'{other}' is not an inspection type"),
            }),
        }
    }
}

/// Inspection urgency. Unlike the other forms the top level is `critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FromStr for InspectionPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(DomainError::InvalidFieldValue {
                field: String::from("priority"),
                reason: format!("'{other}' is not a priority"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    #[default]
    Minor,
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            other => Err(DomainError::InvalidFieldValue {
                field: String::from("severity"),
                reason: format!("'{other}' is not a severity"),
            }),
        }
    }
}

keyed_enum! {
    pub enum InspectionField in "quality-inspection", unknown = UnknownField {
        InspectionNumber => "inspectionNumber",
        InspectionName => "inspectionName",
        InspectionType => "inspectionType",
        Priority => "priority",
        ItemCode => "itemCode",
        ItemName => "itemName",
        ItemDescription => "itemDescription",
        LotNumber => "lotNumber",
        LotQuantity => "lotQuantity",
        SampleSize => "sampleSize",
        SamplingPlan => "samplingPlan",
        ScheduledDate => "scheduledDate",
        ScheduledTime => "scheduledTime",
        AssignedTo => "assignedTo",
        WorkCenter => "workCenter",
        ReferenceDoc => "referenceDoc",
        SpecialInstructions => "specialInstructions",
        Confirmed => "confirmed",
    }
}

keyed_enum! {
    pub enum InspectionCollection in "quality-inspection", unknown = UnknownCollection {
        Checklist => "checklist",
        Defects => "defects",
    }
}

keyed_enum! {
    /// Item fields across the checklist and defect collections.
    pub enum InspectionItemField in "quality-inspection", unknown = UnknownField {
        Parameter => "parameter",
        Specification => "specification",
        Method => "method",
        Acceptance => "acceptance",
        DefectType => "type",
        Quantity => "quantity",
        Location => "location",
        Severity => "severity",
    }
}

/// One parameter to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: LocalId,
    pub parameter: String,
    pub specification: String,
    pub method: String,
    pub acceptance: String,
}

impl ChecklistItem {
    fn blank(id: LocalId) -> Self {
        Self {
            id,
            parameter: String::new(),
            specification: String::new(),
            method: String::new(),
            acceptance: String::new(),
        }
    }
}

impl LocalItem for ChecklistItem {
    fn local_id(&self) -> &LocalId {
        &self.id
    }
}

/// A recorded defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub id: LocalId,
    #[serde(rename = "type")]
    pub defect_type: String,
    pub quantity: u32,
    pub location: String,
    pub severity: Severity,
}

impl Defect {
    fn blank(id: LocalId) -> Self {
        Self {
            id,
            defect_type: String::new(),
            quantity: 1,
            location: String::new(),
            severity: Severity::Minor,
        }
    }
}

impl LocalItem for Defect {
    fn local_id(&self) -> &LocalId {
        &self.id
    }
}

/// `(parameter, specification, method, acceptance)`.
pub type StandardCheck = (&'static str, &'static str, &'static str, &'static str);

const INCOMING_CHECKS: &[StandardCheck] = &[
    ("Visual Appearance", "No defects, scratches", "Visual", "Pass/Fail"),
    ("Dimensional Check", "As per drawing", "Measurement", "±0.5mm"),
    ("Material Certificate", "Available", "Document", "Present"),
];
const IN_PROCESS_CHECKS: &[StandardCheck] = &[
    ("Process Parameters", "Within limits", "Monitoring", "Pass/Fail"),
    ("In-process Dimensions", "As per WIP spec", "Measurement", "±0.3mm"),
];
const FINAL_CHECKS: &[StandardCheck] = &[
    ("Final Dimensions", "As per drawing", "CMM/Manual", "±0.1mm"),
    ("Surface Finish", "Ra < 1.6", "Surface Tester", "Pass/Fail"),
    ("Functional Test", "All functions OK", "Functional", "Pass/Fail"),
    ("Packaging", "As per spec", "Visual", "Pass/Fail"),
];
const PRE_SHIPMENT_CHECKS: &[StandardCheck] = &[
    ("Quantity Verification", "As per order", "Count", "100%"),
    ("Documentation", "Complete", "Document", "All present"),
    ("Packaging Integrity", "No damage", "Visual", "Pass/Fail"),
];

impl InspectionType {
    /// The standard checklist for this inspection type.
    #[must_use]
    pub const fn standard_checks(self) -> &'static [StandardCheck] {
        match self {
            Self::Incoming => INCOMING_CHECKS,
            Self::InProcess => IN_PROCESS_CHECKS,
            Self::Final => FINAL_CHECKS,
            Self::PreShipment => PRE_SHIPMENT_CHECKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InspectionOperation {
    /// Fills the item code, name and description from the catalogue.
    SelectItem { code: String },
    /// Appends the standard checks for the current inspection type.
    LoadStandardChecklist,
}

/// Derived inspection values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSummary {
    /// Sample size as a percentage of the lot.
    pub sample_ratio: Option<f64>,
    pub defect_quantity: u32,
    /// Defective units as a percentage of the sample.
    pub defect_rate: Option<f64>,
    pub critical_defects: usize,
    pub completion: u8,
}

/// A quality inspection being scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityInspection {
    pub inspection_number: String,
    pub inspection_name: String,
    pub inspection_type: InspectionType,
    pub priority: InspectionPriority,
    pub item_code: String,
    pub item_name: String,
    pub item_description: String,
    pub lot_number: String,
    pub lot_quantity: u32,
    pub sample_size: u32,
    pub sampling_plan: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub assigned_to: String,
    pub work_center: String,
    pub reference_doc: String,
    pub checklist: ItemList<ChecklistItem>,
    pub defects: ItemList<Defect>,
    pub special_instructions: String,
    pub confirmed: bool,
}

impl Default for QualityInspection {
    fn default() -> Self {
        Self {
            inspection_number: String::new(),
            inspection_name: String::new(),
            inspection_type: InspectionType::Incoming,
            priority: InspectionPriority::Medium,
            item_code: String::new(),
            item_name: String::new(),
            item_description: String::new(),
            lot_number: String::new(),
            lot_quantity: 0,
            sample_size: 0,
            sampling_plan: String::from("AQL 1.0"),
            scheduled_date: String::new(),
            scheduled_time: String::from("09:00"),
            assigned_to: String::new(),
            work_center: String::new(),
            reference_doc: String::new(),
            checklist: ItemList::new(),
            defects: ItemList::new(),
            special_instructions: String::new(),
            confirmed: false,
        }
    }
}

impl QualityInspection {
    /// Total defective units across all defect records.
    #[must_use]
    pub fn defect_quantity(&self) -> u32 {
        self.defects
            .iter()
            .fold(0_u32, |total, defect| total.saturating_add(defect.quantity))
    }
}

fn check_details(form: &QualityInspection, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        InspectionField::InspectionName.key(),
        &form.inspection_name,
        "Name required",
    );
}

fn check_item(form: &QualityInspection, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        InspectionField::ItemCode.key(),
        &form.item_code,
        "Select an item",
    );
    if form.lot_quantity == 0 {
        errors.insert(InspectionField::LotQuantity.key(), "Lot quantity required");
    }
    let sample_key: FieldKey = InspectionField::SampleSize.key();
    if form.sample_size == 0 {
        errors.insert(sample_key, "Sample size required");
    } else if form.lot_quantity > 0 && form.sample_size > form.lot_quantity {
        errors.insert(sample_key, "Sample size cannot exceed lot quantity");
    }
}

fn check_schedule(
    form: &QualityInspection,
    reference: &ReferenceData,
    errors: &mut ValidationErrors,
) {
    require_date(
        errors,
        InspectionField::ScheduledDate.key(),
        &form.scheduled_date,
        "Date required",
    );
    let key: FieldKey = InspectionField::AssignedTo.key();
    if require_text(errors, key, &form.assigned_to, "Inspector required")
        && !reference.accepts_inspector(&form.assigned_to)
    {
        errors.insert(key, "Unknown inspector");
    }
}

fn check_checklist(form: &QualityInspection, _: &ReferenceData, errors: &mut ValidationErrors) {
    if form.checklist.is_empty() {
        errors.insert(
            InspectionCollection::Checklist.key(),
            "Add at least one check parameter",
        );
    }
}

fn check_confirmed(form: &QualityInspection, _: &ReferenceData, errors: &mut ValidationErrors) {
    if !form.confirmed {
        errors.insert(
            InspectionField::Confirmed.key(),
            "Confirm the inspection details to continue",
        );
    }
}

const DETAILS_RULES: &[StepRule<QualityInspection>] = &[check_details];
const ITEM_RULES: &[StepRule<QualityInspection>] = &[check_item];
const SCHEDULE_RULES: &[StepRule<QualityInspection>] = &[check_schedule];
const CHECKLIST_RULES: &[StepRule<QualityInspection>] = &[check_checklist];
const REVIEW_RULES: &[StepRule<QualityInspection>] = &[check_confirmed];

impl FormSchema for QualityInspection {
    type Field = InspectionField;
    type Collection = InspectionCollection;
    type ItemField = InspectionItemField;
    type Step = InspectionStep;
    type Operation = InspectionOperation;
    type Derived = InspectionSummary;

    const KIND: FormKind = FormKind::QualityInspection;

    fn steps() -> &'static [StepDefinition<InspectionStep>] {
        STEPS
    }

    fn rules(step: InspectionStep) -> &'static [StepRule<Self>] {
        match step {
            InspectionStep::Details => DETAILS_RULES,
            InspectionStep::Item => ITEM_RULES,
            InspectionStep::Schedule => SCHEDULE_RULES,
            InspectionStep::Checklist => CHECKLIST_RULES,
            InspectionStep::Review => REVIEW_RULES,
        }
    }

    fn set_field(&mut self, field: InspectionField, value: FieldValue) -> Result<(), DomainError> {
        let key: FieldKey = field.key();
        match field {
            InspectionField::InspectionNumber => self.inspection_number = value.into_text(key)?,
            InspectionField::InspectionName => self.inspection_name = value.into_text(key)?,
            InspectionField::InspectionType => self.inspection_type = value.into_choice(key)?,
            InspectionField::Priority => self.priority = value.into_choice(key)?,
            InspectionField::ItemCode => self.item_code = value.into_text(key)?,
            InspectionField::ItemName => self.item_name = value.into_text(key)?,
            InspectionField::ItemDescription => self.item_description = value.into_text(key)?,
            InspectionField::LotNumber => self.lot_number = value.into_text(key)?,
            InspectionField::LotQuantity => self.lot_quantity = value.into_count(key)?,
            InspectionField::SampleSize => self.sample_size = value.into_count(key)?,
            InspectionField::SamplingPlan => self.sampling_plan = value.into_text(key)?,
            InspectionField::ScheduledDate => self.scheduled_date = value.into_text(key)?,
            InspectionField::ScheduledTime => self.scheduled_time = value.into_text(key)?,
            InspectionField::AssignedTo => self.assigned_to = value.into_text(key)?,
            InspectionField::WorkCenter => self.work_center = value.into_text(key)?,
            InspectionField::ReferenceDoc => self.reference_doc = value.into_text(key)?,
            InspectionField::SpecialInstructions => {
                self.special_instructions = value.into_text(key)?;
            }
            InspectionField::Confirmed => self.confirmed = value.into_flag(key)?,
        }
        Ok(())
    }

    fn add_item(&mut self, collection: InspectionCollection) -> LocalId {
        match collection {
            InspectionCollection::Checklist => {
                self.checklist.push_with(CHECK_PREFIX, ChecklistItem::blank)
            }
            InspectionCollection::Defects => self.defects.push_with(DEFECT_PREFIX, Defect::blank),
        }
    }

    fn update_item(
        &mut self,
        collection: InspectionCollection,
        id: &LocalId,
        field: InspectionItemField,
        value: FieldValue,
    ) -> Result<(), DomainError> {
        let key: FieldKey = field.key();
        match collection {
            InspectionCollection::Checklist => {
                let check: &mut ChecklistItem = self
                    .checklist
                    .get_mut(id)
                    .ok_or_else(|| item_not_found(collection.key(), id))?;
                match field {
                    InspectionItemField::Parameter => check.parameter = value.into_text(key)?,
                    InspectionItemField::Specification => {
                        check.specification = value.into_text(key)?;
                    }
                    InspectionItemField::Method => check.method = value.into_text(key)?,
                    InspectionItemField::Acceptance => check.acceptance = value.into_text(key)?,
                    InspectionItemField::DefectType
                    | InspectionItemField::Quantity
                    | InspectionItemField::Location
                    | InspectionItemField::Severity => {
                        return Err(not_in_collection(collection.key(), key));
                    }
                }
            }
            InspectionCollection::Defects => {
                let defect: &mut Defect = self
                    .defects
                    .get_mut(id)
                    .ok_or_else(|| item_not_found(collection.key(), id))?;
                match field {
                    InspectionItemField::DefectType => defect.defect_type = value.into_text(key)?,
                    InspectionItemField::Quantity => defect.quantity = value.into_count(key)?,
                    InspectionItemField::Location => defect.location = value.into_text(key)?,
                    InspectionItemField::Severity => defect.severity = value.into_choice(key)?,
                    InspectionItemField::Parameter
                    | InspectionItemField::Specification
                    | InspectionItemField::Method
                    | InspectionItemField::Acceptance => {
                        return Err(not_in_collection(collection.key(), key));
                    }
                }
            }
        }
        Ok(())
    }

    fn remove_item(
        &mut self,
        collection: InspectionCollection,
        id: &LocalId,
    ) -> Result<(), DomainError> {
        let removed: bool = match collection {
            InspectionCollection::Checklist => self.checklist.remove(id).is_some(),
            InspectionCollection::Defects => self.defects.remove(id).is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(item_not_found(collection.key(), id))
        }
    }

    fn apply_operation(
        &mut self,
        operation: &InspectionOperation,
        reference: &ReferenceData,
    ) -> Result<Vec<FieldKey>, DomainError> {
        match operation {
            InspectionOperation::SelectItem { code } => {
                let entry: &CatalogItem =
                    reference
                        .catalog_item(code)
                        .ok_or_else(|| DomainError::ReferenceNotFound {
                            kind: "catalog item",
                            key: code.clone(),
                        })?;
                self.item_code.clone_from(&entry.code);
                self.item_name.clone_from(&entry.name);
                self.item_description.clone_from(&entry.description);
                Ok(vec![
                    InspectionField::ItemCode.key(),
                    InspectionField::ItemName.key(),
                    InspectionField::ItemDescription.key(),
                ])
            }
            InspectionOperation::LoadStandardChecklist => {
                for (parameter, specification, method, acceptance) in
                    self.inspection_type.standard_checks()
                {
                    self.checklist.push_with(CHECK_PREFIX, |id| ChecklistItem {
                        id,
                        parameter: (*parameter).to_string(),
                        specification: (*specification).to_string(),
                        method: (*method).to_string(),
                        acceptance: (*acceptance).to_string(),
                    });
                }
                Ok(vec![InspectionCollection::Checklist.key()])
            }
        }
    }

    fn derive(&self, _: &ReferenceData) -> InspectionSummary {
        let defect_quantity: u32 = self.defect_quantity();
        InspectionSummary {
            sample_ratio: percent_of(f64::from(self.sample_size), f64::from(self.lot_quantity)),
            defect_quantity,
            defect_rate: percent_of(f64::from(defect_quantity), f64::from(self.sample_size)),
            critical_defects: self
                .defects
                .iter()
                .filter(|defect| defect.severity == Severity::Critical)
                .count(),
            completion: self.completion(),
        }
    }

    fn acknowledged(&self) -> bool {
        self.confirmed
    }

    fn completion(&self) -> u8 {
        let tracked: [bool; TRACKED_FIELD_COUNT] = [
            !is_blank(&self.inspection_name),
            !is_blank(&self.item_code),
            self.lot_quantity > 0,
            self.sample_size > 0,
            !is_blank(&self.scheduled_date),
            !is_blank(&self.assigned_to),
            !self.checklist.is_empty(),
            self.confirmed,
        ];
        let filled: usize = tracked.iter().filter(|present| **present).count();
        completion_percent(filled, TRACKED_FIELD_COUNT)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Project creation, six steps.
//!
//! A blank project starts with one team member (the project manager role)
//! and one deliverable so the team and deliverable steps are never empty
//! on first visit.

use crate::error::DomainError;
use crate::form::{FormSchema, Keyed, StepRule, item_not_found, keyed_enum, not_in_collection};
use crate::reference::ReferenceData;
use crate::totals::{ProfitMargin, completion_percent, profit_margin};
use crate::types::{
    FieldKey, FieldValue, FormKind, ItemList, LocalId, LocalItem, StepDefinition,
    ValidationErrors,
};
use crate::validation::{is_blank, parse_iso_date, require_date, require_number, require_text};
use serde::{Deserialize, Serialize};
use time::Date;

const MEMBER_PREFIX: &str = "member";
const DELIVERABLE_PREFIX: &str = "deliverable";
const FULL_ALLOCATION: f64 = 100.0;
const TRACKED_FIELD_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStep {
    BasicInfo,
    TimelineBudget,
    Team,
    Deliverables,
    Scope,
    Review,
}

const STEPS: &[StepDefinition<ProjectStep>] = &[
    StepDefinition {
        id: ProjectStep::BasicInfo,
        label: "Basic Info",
        description: "Project details",
    },
    StepDefinition {
        id: ProjectStep::TimelineBudget,
        label: "Timeline & Budget",
        description: "Schedule and costs",
    },
    StepDefinition {
        id: ProjectStep::Team,
        label: "Team",
        description: "Assign team members",
    },
    StepDefinition {
        id: ProjectStep::Deliverables,
        label: "Deliverables",
        description: "Key milestones",
    },
    StepDefinition {
        id: ProjectStep::Scope,
        label: "Scope",
        description: "Requirements",
    },
    StepDefinition {
        id: ProjectStep::Review,
        label: "Review",
        description: "Confirm and create",
    },
];

keyed_enum! {
    pub enum ProjectField in "project", unknown = UnknownField {
        ProjectName => "projectName",
        ProjectType => "projectType",
        SalesOrderNumber => "salesOrderNumber",
        CustomerId => "customerId",
        CustomerName => "customerName",
        Location => "location",
        Description => "description",
        StartDate => "startDate",
        EndDate => "endDate",
        EstimatedBudget => "estimatedBudget",
        ContractValue => "contractValue",
        Currency => "currency",
        ProjectManager => "projectManager",
        Priority => "priority",
        Department => "department",
        Scope => "scope",
        SpecialRequirements => "specialRequirements",
        SafetyRequirements => "safetyRequirements",
        Confirmed => "confirmed",
    }
}

keyed_enum! {
    pub enum ProjectCollection in "project", unknown = UnknownCollection {
        TeamMembers => "teamMembers",
        Deliverables => "deliverables",
    }
}

keyed_enum! {
    /// Item fields across both project collections.
    pub enum ProjectItemField in "project", unknown = UnknownField {
        Role => "role",
        Name => "name",
        Allocation => "allocation",
        DeliverableType => "type",
        PlannedDate => "plannedDate",
        Details => "details",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: LocalId,
    pub role: String,
    pub name: String,
    /// Percentage of the member's time, 1 to 100.
    pub allocation: f64,
}

impl TeamMember {
    fn blank(id: LocalId) -> Self {
        Self {
            id,
            role: String::new(),
            name: String::new(),
            allocation: FULL_ALLOCATION,
        }
    }
}

impl LocalItem for TeamMember {
    fn local_id(&self) -> &LocalId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: LocalId,
    pub name: String,
    #[serde(rename = "type")]
    pub deliverable_type: String,
    pub planned_date: String,
    pub details: String,
}

impl Deliverable {
    fn blank(id: LocalId) -> Self {
        Self {
            id,
            name: String::new(),
            deliverable_type: String::from("Equipment"),
            planned_date: String::new(),
            details: String::new(),
        }
    }
}

impl LocalItem for Deliverable {
    fn local_id(&self) -> &LocalId {
        &self.id
    }
}

/// Projects have no multi-field operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectOperation {}

/// Derived project values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Days from start to end, only when both dates parse and the span is positive.
    pub duration_days: Option<i64>,
    /// Present only when budget and contract value are both positive.
    pub margin: Option<ProfitMargin>,
    /// Sum of every member's allocation, in full-time equivalents.
    pub team_capacity: f64,
    pub completion: u8,
}

/// A project being created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub project_name: String,
    pub project_type: String,
    pub sales_order_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub location: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub estimated_budget: Option<f64>,
    pub contract_value: Option<f64>,
    pub currency: String,
    pub project_manager: String,
    pub priority: String,
    pub department: String,
    pub team_members: ItemList<TeamMember>,
    pub deliverables: ItemList<Deliverable>,
    pub scope: String,
    pub special_requirements: String,
    pub safety_requirements: String,
    pub confirmed: bool,
}

impl Default for Project {
    fn default() -> Self {
        let mut team_members: ItemList<TeamMember> = ItemList::new();
        team_members.push_with(MEMBER_PREFIX, |id| TeamMember {
            role: String::from("Project Manager"),
            ..TeamMember::blank(id)
        });
        let mut deliverables: ItemList<Deliverable> = ItemList::new();
        deliverables.push_with(DELIVERABLE_PREFIX, Deliverable::blank);

        Self {
            project_name: String::new(),
            project_type: String::from("Commercial Kitchen"),
            sales_order_number: String::new(),
            customer_id: String::new(),
            customer_name: String::new(),
            location: String::new(),
            description: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            estimated_budget: None,
            contract_value: None,
            currency: String::from("INR"),
            project_manager: String::new(),
            priority: String::from("P2"),
            department: String::from("Project Management"),
            team_members,
            deliverables,
            scope: String::new(),
            special_requirements: String::new(),
            safety_requirements: String::new(),
            confirmed: false,
        }
    }
}

impl Project {
    /// Whole days from start to end, when both dates parse and end is after start.
    #[must_use]
    pub fn duration_days(&self) -> Option<i64> {
        let start: Date = parse_iso_date(&self.start_date)?;
        let end: Date = parse_iso_date(&self.end_date)?;
        let days: i64 = (end - start).whole_days();
        (days > 0).then_some(days)
    }
}

fn check_basic_info(form: &Project, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        ProjectField::ProjectName.key(),
        &form.project_name,
        "Project name is required",
    );
    require_text(
        errors,
        ProjectField::SalesOrderNumber.key(),
        &form.sales_order_number,
        "Sales order number is required",
    );
    require_text(
        errors,
        ProjectField::CustomerName.key(),
        &form.customer_name,
        "Customer name is required",
    );
    require_text(
        errors,
        ProjectField::Location.key(),
        &form.location,
        "Location is required",
    );
}

fn check_timeline(form: &Project, _: &ReferenceData, errors: &mut ValidationErrors) {
    let start: Option<Date> = require_date(
        errors,
        ProjectField::StartDate.key(),
        &form.start_date,
        "Start date is required",
    );
    let end_key: FieldKey = ProjectField::EndDate.key();
    let end: Option<Date> = require_date(errors, end_key, &form.end_date, "End date is required");
    if matches!((start, end), (Some(start), Some(end)) if end <= start) {
        errors.insert(end_key, "End date must be after start date");
    }
}

fn check_budget(form: &Project, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_number(
        errors,
        ProjectField::EstimatedBudget.key(),
        form.estimated_budget,
        "Budget is required",
    );
    require_number(
        errors,
        ProjectField::ContractValue.key(),
        form.contract_value,
        "Contract value is required",
    );
}

fn check_team(form: &Project, _: &ReferenceData, errors: &mut ValidationErrors) {
    require_text(
        errors,
        ProjectField::ProjectManager.key(),
        &form.project_manager,
        "Project manager is required",
    );
    let out_of_range: bool = form
        .team_members
        .iter()
        .any(|member| !(1.0..=FULL_ALLOCATION).contains(&member.allocation));
    if out_of_range {
        errors.insert(
            ProjectCollection::TeamMembers.key(),
            "Allocation must be between 1 and 100",
        );
    }
}

fn check_deliverables(form: &Project, _: &ReferenceData, errors: &mut ValidationErrors) {
    if form
        .deliverables
        .iter()
        .any(|deliverable| is_blank(&deliverable.name))
    {
        errors.insert(
            ProjectCollection::Deliverables.key(),
            "Every deliverable needs a name",
        );
    }
}

fn check_confirmed(form: &Project, _: &ReferenceData, errors: &mut ValidationErrors) {
    if !form.confirmed {
        errors.insert(
            ProjectField::Confirmed.key(),
            "Confirm the project details to continue",
        );
    }
}

const BASIC_INFO_RULES: &[StepRule<Project>] = &[check_basic_info];
const TIMELINE_RULES: &[StepRule<Project>] = &[check_timeline, check_budget];
const TEAM_RULES: &[StepRule<Project>] = &[check_team];
const DELIVERABLE_RULES: &[StepRule<Project>] = &[check_deliverables];
const SCOPE_RULES: &[StepRule<Project>] = &[];
const REVIEW_RULES: &[StepRule<Project>] = &[check_confirmed];

impl FormSchema for Project {
    type Field = ProjectField;
    type Collection = ProjectCollection;
    type ItemField = ProjectItemField;
    type Step = ProjectStep;
    type Operation = ProjectOperation;
    type Derived = ProjectSummary;

    const KIND: FormKind = FormKind::Project;

    fn steps() -> &'static [StepDefinition<ProjectStep>] {
        STEPS
    }

    fn rules(step: ProjectStep) -> &'static [StepRule<Self>] {
        match step {
            ProjectStep::BasicInfo => BASIC_INFO_RULES,
            ProjectStep::TimelineBudget => TIMELINE_RULES,
            ProjectStep::Team => TEAM_RULES,
            ProjectStep::Deliverables => DELIVERABLE_RULES,
            ProjectStep::Scope => SCOPE_RULES,
            ProjectStep::Review => REVIEW_RULES,
        }
    }

    fn set_field(&mut self, field: ProjectField, value: FieldValue) -> Result<(), DomainError> {
        let key: FieldKey = field.key();
        match field {
            ProjectField::ProjectName => self.project_name = value.into_text(key)?,
            ProjectField::ProjectType => self.project_type = value.into_text(key)?,
            ProjectField::SalesOrderNumber => self.sales_order_number = value.into_text(key)?,
            ProjectField::CustomerId => self.customer_id = value.into_text(key)?,
            ProjectField::CustomerName => self.customer_name = value.into_text(key)?,
            ProjectField::Location => self.location = value.into_text(key)?,
            ProjectField::Description => self.description = value.into_text(key)?,
            ProjectField::StartDate => self.start_date = value.into_text(key)?,
            ProjectField::EndDate => self.end_date = value.into_text(key)?,
            ProjectField::EstimatedBudget => {
                self.estimated_budget = value.into_optional_number(key)?;
            }
            ProjectField::ContractValue => {
                self.contract_value = value.into_optional_number(key)?;
            }
            ProjectField::Currency => self.currency = value.into_text(key)?,
            ProjectField::ProjectManager => self.project_manager = value.into_text(key)?,
            ProjectField::Priority => self.priority = value.into_text(key)?,
            ProjectField::Department => self.department = value.into_text(key)?,
            ProjectField::Scope => self.scope = value.into_text(key)?,
            ProjectField::SpecialRequirements => {
                self.special_requirements = value.into_text(key)?;
            }
            ProjectField::SafetyRequirements => {
                self.safety_requirements = value.into_text(key)?;
            }
            ProjectField::Confirmed => self.confirmed = value.into_flag(key)?,
        }
        Ok(())
    }

    fn add_item(&mut self, collection: ProjectCollection) -> LocalId {
        match collection {
            ProjectCollection::TeamMembers => {
                self.team_members.push_with(MEMBER_PREFIX, TeamMember::blank)
            }
            ProjectCollection::Deliverables => self
                .deliverables
                .push_with(DELIVERABLE_PREFIX, Deliverable::blank),
        }
    }

    fn update_item(
        &mut self,
        collection: ProjectCollection,
        id: &LocalId,
        field: ProjectItemField,
        value: FieldValue,
    ) -> Result<(), DomainError> {
        let key: FieldKey = field.key();
        match collection {
            ProjectCollection::TeamMembers => {
                let member: &mut TeamMember = self
                    .team_members
                    .get_mut(id)
                    .ok_or_else(|| item_not_found(collection.key(), id))?;
                match field {
                    ProjectItemField::Role => member.role = value.into_text(key)?,
                    ProjectItemField::Name => member.name = value.into_text(key)?,
                    ProjectItemField::Allocation => member.allocation = value.into_number(key)?,
                    ProjectItemField::DeliverableType
                    | ProjectItemField::PlannedDate
                    | ProjectItemField::Details => {
                        return Err(not_in_collection(collection.key(), key));
                    }
                }
            }
            ProjectCollection::Deliverables => {
                let deliverable: &mut Deliverable = self
                    .deliverables
                    .get_mut(id)
                    .ok_or_else(|| item_not_found(collection.key(), id))?;
                match field {
                    ProjectItemField::Name => deliverable.name = value.into_text(key)?,
                    ProjectItemField::DeliverableType => {
                        deliverable.deliverable_type = value.into_text(key)?;
                    }
                    ProjectItemField::PlannedDate => {
                        deliverable.planned_date = value.into_text(key)?;
                    }
                    ProjectItemField::Details => deliverable.details = value.into_text(key)?,
                    ProjectItemField::Role | ProjectItemField::Allocation => {
                        return Err(not_in_collection(collection.key(), key));
                    }
                }
            }
        }
        Ok(())
    }

    fn remove_item(&mut self, collection: ProjectCollection, id: &LocalId) -> Result<(), DomainError> {
        let removed: bool = match collection {
            ProjectCollection::TeamMembers => self.team_members.remove(id).is_some(),
            ProjectCollection::Deliverables => self.deliverables.remove(id).is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(item_not_found(collection.key(), id))
        }
    }

    fn apply_operation(
        &mut self,
        operation: &ProjectOperation,
        _: &ReferenceData,
    ) -> Result<Vec<FieldKey>, DomainError> {
        match *operation {}
    }

    fn derive(&self, _: &ReferenceData) -> ProjectSummary {
        ProjectSummary {
            duration_days: self.duration_days(),
            margin: profit_margin(
                self.contract_value.unwrap_or(0.0),
                self.estimated_budget.unwrap_or(0.0),
            ),
            team_capacity: self
                .team_members
                .iter()
                .map(|member| member.allocation / FULL_ALLOCATION)
                .sum(),
            completion: self.completion(),
        }
    }

    fn acknowledged(&self) -> bool {
        self.confirmed
    }

    fn completion(&self) -> u8 {
        let tracked: [bool; TRACKED_FIELD_COUNT] = [
            !is_blank(&self.project_name),
            !is_blank(&self.project_type),
            !is_blank(&self.sales_order_number),
            !is_blank(&self.customer_name),
            !is_blank(&self.location),
            !is_blank(&self.start_date),
            !is_blank(&self.end_date),
            self.estimated_budget.is_some(),
            self.contract_value.is_some(),
            !is_blank(&self.project_manager),
        ];
        let filled: usize = tracked.iter().filter(|present| **present).count();
        completion_percent(filled, TRACKED_FIELD_COUNT)
    }
}

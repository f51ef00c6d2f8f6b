// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::actor::IdentityHandle;
use crate::workflow::{self, Status};

/// Per-project permission sets.
///
/// Two invariants are maintained by the engine at all times: the owning client is always present
/// in `view_access` and `comment_access`, and every assigned staff member is present in all
/// three sets.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Permissions<ID>
where
    ID: IdentityHandle,
{
    pub view_access: HashSet<ID>,
    pub edit_access: HashSet<ID>,
    pub comment_access: HashSet<ID>,
    pub approval_required: bool,
}

impl<ID> Permissions<ID>
where
    ID: IdentityHandle,
{
    /// Initial permission sets for a new project: the owning client holds view and comment
    /// access.
    pub fn new(client_id: ID) -> Self {
        Self {
            view_access: HashSet::from([client_id]),
            edit_access: HashSet::new(),
            comment_access: HashSet::from([client_id]),
            approval_required: false,
        }
    }

    /// Grant view and comment access.
    pub fn grant_view_comment(&mut self, id: ID) {
        self.view_access.insert(id);
        self.comment_access.insert(id);
    }

    /// Grant full working access: view, edit and comment.
    pub fn grant_working_access(&mut self, id: ID) {
        self.view_access.insert(id);
        self.edit_access.insert(id);
        self.comment_access.insert(id);
    }
}

/// Project schedule and effort tracking. Timestamps are unix seconds.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Timeline {
    pub start_date: Option<u64>,
    pub end_date: Option<u64>,
    pub estimated_hours: u64,
    pub actual_hours: Option<u64>,
}

/// The central project entity.
///
/// `id`, `client_id` and `company_id` are immutable after creation. `completed_at` is set
/// exactly once, when the project enters [`Status::Completed`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Project<ID>
where
    ID: IdentityHandle,
{
    pub id: ID,
    pub client_id: ID,
    pub company_id: ID,
    pub project_manager: ID,
    pub assigned_staff: HashSet<ID>,
    pub status: Status,
    pub permissions: Permissions<ID>,
    pub timeline: Timeline,
    pub title: String,
    pub description: String,
    pub communications: Vec<String>,
    pub budget: Option<u64>,
    pub completed_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl<ID> Project<ID>
where
    ID: IdentityHandle,
{
    /// A fresh project in the `Planning` state with no assigned staff and the owning client
    /// granted view and comment access.
    pub fn new(id: ID, client_id: ID, company_id: ID, project_manager: ID, now: u64) -> Self {
        Self {
            id,
            client_id,
            company_id,
            project_manager,
            assigned_staff: HashSet::new(),
            status: Status::Planning,
            permissions: Permissions::new(client_id),
            timeline: Timeline::default(),
            title: String::new(),
            description: String::new(),
            communications: Vec::new(),
            budget: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// All parties with a stake in this project: the owning client, the project manager and
    /// every assigned staff member, minus `exclude` (typically the actor triggering a change).
    pub fn stakeholders(&self, exclude: &ID) -> Vec<ID> {
        let mut ids = self.assigned_staff.clone();
        ids.insert(self.client_id);
        ids.insert(self.project_manager);
        ids.remove(exclude);
        ids.into_iter().collect()
    }
}

/// Names of the fields an update may touch, as a closed set.
///
/// The per-role write policy in [`filter`](crate::filter) is keyed on these names, keeping the
/// whole policy auditable in one place. The owning client and company are immutable after
/// creation and deliberately have no field name here; no update can reach them.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Title,
    Description,
    Communications,
    Budget,
    Status,
    Timeline,
    ProjectManager,
    AssignedStaff,
}

/// A proposed set of field changes, one optional slot per updatable field.
///
/// Updates are filtered through [`filter_update`](crate::filter::filter_update) before they are
/// applied; fields a role may not touch are silently cleared.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProjectUpdate<ID>
where
    ID: IdentityHandle,
{
    pub title: Option<String>,
    pub description: Option<String>,
    pub communications: Option<Vec<String>>,
    pub budget: Option<u64>,
    pub status: Option<Status>,
    pub timeline: Option<Timeline>,
    pub project_manager: Option<ID>,
    pub assigned_staff: Option<HashSet<ID>>,
}

impl<ID> ProjectUpdate<ID>
where
    ID: IdentityHandle,
{
    /// Names of the fields present in this update.
    pub fn fields(&self) -> Vec<FieldName> {
        let mut fields = Vec::new();

        if self.title.is_some() {
            fields.push(FieldName::Title);
        }
        if self.description.is_some() {
            fields.push(FieldName::Description);
        }
        if self.communications.is_some() {
            fields.push(FieldName::Communications);
        }
        if self.budget.is_some() {
            fields.push(FieldName::Budget);
        }
        if self.status.is_some() {
            fields.push(FieldName::Status);
        }
        if self.timeline.is_some() {
            fields.push(FieldName::Timeline);
        }
        if self.project_manager.is_some() {
            fields.push(FieldName::ProjectManager);
        }
        if self.assigned_staff.is_some() {
            fields.push(FieldName::AssignedStaff);
        }

        fields
    }

    /// Drop a field from the update.
    pub fn clear(&mut self, field: FieldName) {
        match field {
            FieldName::Title => self.title = None,
            FieldName::Description => self.description = None,
            FieldName::Communications => self.communications = None,
            FieldName::Budget => self.budget = None,
            FieldName::Status => self.status = None,
            FieldName::Timeline => self.timeline = None,
            FieldName::ProjectManager => self.project_manager = None,
            FieldName::AssignedStaff => self.assigned_staff = None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Apply the update in place and bump `updated_at`.
    ///
    /// A status field is applied through the workflow engine's transition side effects
    /// (completion timestamp, actual-hours snapshot); transition _validity_ must have been
    /// checked by the caller beforehand. Staff named in `assigned_staff` are merged into the
    /// existing assignment and granted working access, so an assigned staff member always holds
    /// view, edit and comment rights whichever path assigned them.
    pub fn apply_to(self, project: &mut Project<ID>, now: u64) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(communications) = self.communications {
            project.communications = communications;
        }
        if let Some(budget) = self.budget {
            project.budget = Some(budget);
        }
        if let Some(timeline) = self.timeline {
            project.timeline = timeline;
        }
        if let Some(project_manager) = self.project_manager {
            project.project_manager = project_manager;
        }
        if let Some(assigned_staff) = self.assigned_staff {
            for id in assigned_staff {
                project.assigned_staff.insert(id);
                project.permissions.grant_working_access(id);
            }
        }
        if let Some(status) = self.status {
            workflow::apply_transition(project, status, now);
        }

        project.updated_at = now;
    }
}

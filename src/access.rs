// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure predicates answering whether an actor may view, edit, delete or create a project.
//!
//! These functions are total and side-effect free; they never fail. Callers turn a `false` into
//! an [`AccessDenied`](crate::error::EngineError::AccessDenied) failure where appropriate.

use std::fmt::Display;

use crate::actor::{Actor, IdentityHandle, Role};
use crate::project::Project;

/// The capability an actor was checked against, carried inside `AccessDenied` failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Capability {
    View,
    Edit,
    Delete,
    Create,
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Capability::View => "view",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
            Capability::Create => "create",
        };

        write!(f, "{}", s)
    }
}

/// Return true if the actor may view the project.
///
/// Membership in `view_access` is sufficient, but the owning client, the project manager and
/// assigned staff are recognised independently as a fallback. Callers must not assume
/// `view_access` is exhaustive.
pub fn can_view<ID>(project: &Project<ID>, actor: &Actor<ID>) -> bool
where
    ID: IdentityHandle,
{
    project.permissions.view_access.contains(&actor.id)
        || actor.id == project.client_id
        || actor.id == project.project_manager
        || project.assigned_staff.contains(&actor.id)
}

/// Return true if the actor may edit the project.
///
/// Granted to members of `edit_access`, the project manager, and admins of the project's
/// company.
pub fn can_edit<ID>(project: &Project<ID>, actor: &Actor<ID>) -> bool
where
    ID: IdentityHandle,
{
    project.permissions.edit_access.contains(&actor.id)
        || actor.id == project.project_manager
        || matches!(actor.role, Role::Admin { company_id } if company_id == project.company_id)
}

/// Return true if the actor may delete projects at all.
///
/// Deletion is admin-only. The company-scope check happens at the orchestrator level since it
/// requires the project.
pub fn can_delete<ID>(actor: &Actor<ID>) -> bool
where
    ID: IdentityHandle,
{
    actor.role.is_admin()
}

/// Return true if the actor may create projects.
pub fn can_create<ID>(actor: &Actor<ID>) -> bool
where
    ID: IdentityHandle,
{
    matches!(actor.role, Role::Client | Role::Admin { .. })
}

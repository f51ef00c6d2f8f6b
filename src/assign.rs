// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff assignment for projects.
//!
//! Assignment is purely additive: staff are never removed through this interface. Assignment
//! and the three permission sets are updated together, so an assigned staff member always holds
//! full working access.

use crate::access::Capability;
use crate::actor::{Actor, IdentityHandle, Role};
use crate::error::EngineError;
use crate::project::Project;

/// The result of a staff assignment.
///
/// `newly_assigned` holds the staff ids that were not yet assigned before the operation, in
/// request order. This is the set that notification fan-out targets; staff who were already
/// assigned are not notified again.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment<ID>
where
    ID: IdentityHandle,
{
    pub project: Project<ID>,
    pub newly_assigned: Vec<ID>,
}

/// Assign staff to a project.
///
/// Requires an admin of the project's company. The newly-assigned set is computed against the
/// pre-update `assigned_staff`; afterwards the assignment set and all three permission sets are
/// unioned with `staff_ids`.
pub fn assign_staff<ID>(
    mut project: Project<ID>,
    staff_ids: &[ID],
    actor: &Actor<ID>,
    now: u64,
) -> Result<Assignment<ID>, EngineError<ID>>
where
    ID: IdentityHandle,
{
    match actor.role {
        Role::Admin { company_id } if company_id == project.company_id => {}
        Role::Admin { .. } => {
            return Err(EngineError::CompanyMismatch {
                actor: actor.id,
                project: project.id,
            });
        }
        _ => {
            return Err(EngineError::AccessDenied {
                actor: actor.id,
                capability: Capability::Edit,
            });
        }
    }

    let mut newly_assigned = Vec::new();

    for id in staff_ids {
        if project.assigned_staff.insert(*id) {
            newly_assigned.push(*id);
        }

        // Granted unconditionally so a prior partial grant is repaired as well.
        project.permissions.grant_working_access(*id);
    }

    project.updated_at = now;

    Ok(Assignment {
        project,
        newly_assigned,
    })
}

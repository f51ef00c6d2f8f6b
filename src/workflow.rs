// SPDX-License-Identifier: MIT OR Apache-2.0

//! The project lifecycle as a finite-state machine.
//!
//! Transitions are only legal along the edges encoded in [`Status::can_transition_to`].
//! `Completed` is terminal; a cancelled project can be restarted into `Planning`. Cancellation
//! itself is an admin-only transition regardless of edit access.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::access::{self, Capability};
use crate::actor::{Actor, IdentityHandle};
use crate::error::EngineError;
use crate::project::Project;

/// Lifecycle position of a project.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Planning,
    InProgress,
    Review,
    Completed,
    Cancelled,
}

impl Status {
    /// All states, in declaration order.
    pub const ALL: [Status; 5] = [
        Status::Planning,
        Status::InProgress,
        Status::Review,
        Status::Completed,
        Status::Cancelled,
    ];

    /// Return true if `next` is a legal transition from this state.
    pub fn can_transition_to(self, next: Status) -> bool {
        use Status::*;

        matches!(
            (self, next),
            (Planning, InProgress | Cancelled)
                | (InProgress, Review | Completed | Cancelled)
                | (Review, InProgress | Completed)
                | (Cancelled, Planning)
        )
    }

    /// Return true if no transitions leave this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Completed)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Planning => "planning",
            Status::InProgress => "in_progress",
            Status::Review => "review",
            Status::Completed => "completed",
            Status::Cancelled => "cancelled",
        };

        write!(f, "{}", s)
    }
}

/// Validate that the actor may move the project into `next`.
///
/// Checks the transition table and the admin-only restriction on cancellation. Does not check
/// edit access; [`change_status`] composes both.
pub fn check_transition<ID>(
    project: &Project<ID>,
    next: Status,
    actor: &Actor<ID>,
) -> Result<(), EngineError<ID>>
where
    ID: IdentityHandle,
{
    let from = project.status;

    if !from.can_transition_to(next) {
        return Err(EngineError::InvalidTransition { from, to: next });
    }

    if next == Status::Cancelled && !actor.role.is_admin() {
        return Err(EngineError::InvalidTransition { from, to: next });
    }

    Ok(())
}

/// Move a validated transition's side effects into the project.
///
/// On entering `Completed` the completion timestamp is set and `timeline.actual_hours` is
/// snapshotted, carried forward unchanged if already populated and defaulting to 0 otherwise.
pub(crate) fn apply_transition<ID>(project: &mut Project<ID>, next: Status, now: u64)
where
    ID: IdentityHandle,
{
    project.status = next;

    if next == Status::Completed {
        project.completed_at = Some(now);
        if project.timeline.actual_hours.is_none() {
            project.timeline.actual_hours = Some(0);
        }
    }

    project.updated_at = now;
}

/// Move a project into a new lifecycle state.
///
/// Fails with `AccessDenied` when the actor cannot edit the project, and with
/// `InvalidTransition` for off-table edges or non-admin cancellation. Notification fan-out to
/// stakeholders is the orchestrator's concern, not part of the state machine.
pub fn change_status<ID>(
    mut project: Project<ID>,
    next: Status,
    actor: &Actor<ID>,
    now: u64,
) -> Result<Project<ID>, EngineError<ID>>
where
    ID: IdentityHandle,
{
    if !access::can_edit(&project, actor) {
        return Err(EngineError::AccessDenied {
            actor: actor.id,
            capability: Capability::Edit,
        });
    }

    check_transition(&project, next, actor)?;
    apply_transition(&mut project, next, now);

    Ok(project)
}

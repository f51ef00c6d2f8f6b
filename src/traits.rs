// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the engine's external collaborators: the project document store, the
//! notification sink and the append-only audit log.
//!
//! All three are async with an associated error type. The store is expected to serialise
//! concurrent writers per document; the engine holds no locks of its own.

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::actor::IdentityHandle;
use crate::project::{FieldName, Project};
use crate::workflow::Status;

/// The query scope a project listing is restricted to.
///
/// The scope is derived from the actor's role by the orchestrator and handed to the store as-is;
/// caller-supplied filters can never widen it, so cross-role leakage is impossible by
/// construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryScope<ID>
where
    ID: IdentityHandle,
{
    /// Projects owned by this client.
    Client(ID),

    /// Projects this staff member is assigned to.
    Staff(ID),

    /// All projects of this company.
    Company(ID),
}

impl<ID> QueryScope<ID>
where
    ID: IdentityHandle,
{
    /// Return true if the project falls within this scope.
    pub fn matches(&self, project: &Project<ID>) -> bool {
        match self {
            QueryScope::Client(id) => project.client_id == *id,
            QueryScope::Staff(id) => project.assigned_staff.contains(id),
            QueryScope::Company(id) => project.company_id == *id,
        }
    }
}

/// Persistence for project documents.
///
/// Each call is assumed atomic per document. `update` writes the whole already-mutated
/// document; read-modify-write sequences across calls rely on the store serialising concurrent
/// writers to the same project.
pub trait ProjectStore<ID>
where
    ID: IdentityHandle,
{
    type Error: Error;

    /// Fetch a project by id.
    fn get(
        &self,
        id: &ID,
    ) -> impl Future<Output = Result<Option<Project<ID>>, Self::Error>>;

    /// Persist a newly created project.
    fn insert(
        &mut self,
        project: Project<ID>,
    ) -> impl Future<Output = Result<Project<ID>, Self::Error>>;

    /// Persist an updated project document.
    fn update(
        &mut self,
        project: Project<ID>,
    ) -> impl Future<Output = Result<Project<ID>, Self::Error>>;

    /// All projects within the given scope.
    fn query(
        &self,
        scope: &QueryScope<ID>,
    ) -> impl Future<Output = Result<Vec<Project<ID>>, Self::Error>>;

    /// Remove a project document.
    ///
    /// Returns `true` when a document was removed and `false` when none existed.
    fn delete(&mut self, id: &ID) -> impl Future<Output = Result<bool, Self::Error>>;
}

/// A transient notification instruction, handed to the sink and forgotten.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Notification<ID>
where
    ID: IdentityHandle,
{
    pub recipient_id: ID,
    pub title: String,
    pub message: String,
    pub project_id: ID,
    pub action_url: String,
}

/// Delivery of notifications to stakeholders.
///
/// Fire-and-forget from the engine's perspective: delivery failures are logged and swallowed at
/// the call site, never surfaced as an operation failure.
pub trait NotificationSink<ID>
where
    ID: IdentityHandle,
{
    type Error: Error;

    fn send(
        &mut self,
        notification: Notification<ID>,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}

/// What a mutating operation did, recorded in the audit trail.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Activity<ID>
where
    ID: IdentityHandle,
{
    Created,
    Updated {
        fields: Vec<FieldName>,
    },
    StaffAssigned {
        newly_assigned: Vec<ID>,
    },
    StatusChanged {
        from: Status,
        to: Status,
        comment: Option<String>,
    },
    Deleted,
}

/// An append-only audit entry, produced by every successful mutating operation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActivityRecord<ID>
where
    ID: IdentityHandle,
{
    pub actor_id: ID,
    pub action: Activity<ID>,
    pub project_id: ID,
    pub timestamp: u64,
}

/// The append-only audit trail.
pub trait AuditLog<ID>
where
    ID: IdentityHandle,
{
    type Error: Error;

    fn append(
        &mut self,
        record: ActivityRecord<ID>,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}

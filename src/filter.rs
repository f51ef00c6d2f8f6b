// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-based write filtering for project updates.
//!
//! The whole per-role policy lives in the two tables below. Disallowed fields are silently
//! dropped rather than rejected: clients lose edits they cannot make instead of seeing a hard
//! failure.

use crate::actor::{Actor, IdentityHandle, Role};
use crate::project::{FieldName, ProjectUpdate};

/// Fields a client may write.
const CLIENT_ALLOWED: &[FieldName] = &[FieldName::Description, FieldName::Communications];

/// Fields a staff member may never write, regardless of content.
///
/// The owning client and company have no [`FieldName`] at all, so they need no entry here; no
/// role can reach them through an update.
const STAFF_DENIED: &[FieldName] = &[FieldName::AssignedStaff];

enum FieldPolicy {
    Allow(&'static [FieldName]),
    Deny(&'static [FieldName]),
    All,
}

impl FieldPolicy {
    fn permits(&self, field: FieldName) -> bool {
        match self {
            FieldPolicy::Allow(fields) => fields.contains(&field),
            FieldPolicy::Deny(fields) => !fields.contains(&field),
            FieldPolicy::All => true,
        }
    }
}

fn policy_for<ID>(role: &Role<ID>) -> FieldPolicy
where
    ID: IdentityHandle,
{
    match role {
        Role::Client => FieldPolicy::Allow(CLIENT_ALLOWED),
        Role::Staff { .. } => FieldPolicy::Deny(STAFF_DENIED),
        Role::Admin { .. } => FieldPolicy::All,
    }
}

/// Strip the fields the actor's role may not write from a proposed update.
///
/// Must be evaluated strictly before the update reaches the storage collaborator; unfiltered
/// input is never persisted under any role. An update that filters down to empty is still a
/// valid (no-op) write.
pub fn filter_update<ID>(mut update: ProjectUpdate<ID>, actor: &Actor<ID>) -> ProjectUpdate<ID>
where
    ID: IdentityHandle,
{
    let policy = policy_for(&actor.role);

    for field in update.fields() {
        if !policy.permits(field) {
            update.clear(field);
        }
    }

    update
}

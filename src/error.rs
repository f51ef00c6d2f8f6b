// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::access::Capability;
use crate::actor::IdentityHandle;
use crate::workflow::Status;

/// Failures produced by the engine's own authorisation and workflow checks.
///
/// All checks fail fast and synchronously; a rejected operation is never partially applied.
/// Collaborator failures (storage, audit log) are wrapped separately by
/// [`ServiceError`](crate::service::ServiceError).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EngineError<ID>
where
    ID: IdentityHandle,
{
    #[error("actor {actor} lacks {capability} access")]
    AccessDenied { actor: ID, capability: Capability },

    #[error("project {0} not found")]
    NotFound(ID),

    #[error("actor {actor} is scoped to a different company than project {project}")]
    CompanyMismatch { actor: ID, project: ID },

    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("unrecognised role {0:?}")]
    InvalidRole(String),

    #[error("project creation by {0} must name an owning client")]
    MissingClient(ID),
}

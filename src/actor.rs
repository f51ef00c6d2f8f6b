// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::EngineError;

/// Bound for actor, project and company identifiers.
///
/// Identifiers are opaque to the engine; the integrating layer decides on a concrete type
/// (database document id, UUID, public key, etc.).
pub trait IdentityHandle: Copy + Debug + Display + Eq + Hash {}

/// The role an actor performs, as a closed set.
///
/// Staff and admin actors belong to a production company; clients do not carry a company scope.
/// Dispatching on this enum is exhaustive, so an unrecognised role can never slip through an
/// authorisation check.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role<ID> {
    Client,
    Staff { company_id: ID },
    Admin { company_id: ID },
}

impl<ID> Role<ID>
where
    ID: IdentityHandle,
{
    /// Construct a role from an untyped label, as delivered by an authentication layer.
    ///
    /// Staff and admin roles require a company scope. Anything other than `client`, `staff` or
    /// `admin` is rejected.
    pub fn parse(label: &str, company_id: Option<ID>) -> Result<Self, EngineError<ID>> {
        match (label, company_id) {
            ("client", _) => Ok(Role::Client),
            ("staff", Some(company_id)) => Ok(Role::Staff { company_id }),
            ("admin", Some(company_id)) => Ok(Role::Admin { company_id }),
            _ => Err(EngineError::InvalidRole(label.to_string())),
        }
    }

    /// Return the company scope of a staff or admin actor.
    pub fn company_id(&self) -> Option<ID> {
        match self {
            Role::Client => None,
            Role::Staff { company_id } => Some(*company_id),
            Role::Admin { company_id } => Some(*company_id),
        }
    }

    /// Return true if this is a client role.
    pub fn is_client(&self) -> bool {
        matches!(self, Role::Client)
    }

    /// Return true if this is a staff role.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff { .. })
    }

    /// Return true if this is an admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin { .. })
    }
}

impl<ID> Display for Role<ID> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Client => "client",
            Role::Staff { .. } => "staff",
            Role::Admin { .. } => "admin",
        };

        write!(f, "{}", s)
    }
}

/// An authenticated participant performing an operation.
///
/// Actors are ephemeral request-scoped values supplied by the authentication collaborator; the
/// engine never persists them and holds no ambient "current user" state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Actor<ID>
where
    ID: IdentityHandle,
{
    pub id: ID,
    pub role: Role<ID>,
}

impl<ID> Actor<ID>
where
    ID: IdentityHandle,
{
    pub fn new(id: ID, role: Role<ID>) -> Self {
        Self { id, role }
    }
}

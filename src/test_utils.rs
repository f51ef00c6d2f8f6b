// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for the test suite. Identifiers are plain `char`s so fixtures read as
//! single-letter cast lists.

use crate::actor::{Actor, IdentityHandle, Role};
use crate::project::Project;

impl IdentityHandle for char {}

pub fn client(id: char) -> Actor<char> {
    Actor::new(id, Role::Client)
}

pub fn staff(id: char, company_id: char) -> Actor<char> {
    Actor::new(id, Role::Staff { company_id })
}

pub fn admin(id: char, company_id: char) -> Actor<char> {
    Actor::new(id, Role::Admin { company_id })
}

/// A fresh planning-stage project fixture.
pub fn project(id: char, client_id: char, company_id: char, manager_id: char) -> Project<char> {
    Project::new(id, client_id, company_id, manager_id, 1_000)
}

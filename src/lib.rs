// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc=include_str!("../README.md"))]

//! Role-based project access control and lifecycle workflows for production studios.
//!
//! `greenlight` is the decision core of a project-management system with three kinds of actors:
//! clients who commission projects, production staff who work on them, and company admins who
//! run them. For a given actor and project document it decides what operations are permitted,
//! which fields of an update are allowed through, how staff get assigned and notified, and how
//! a project legally moves between lifecycle states.
//!
//! The engine is deliberately thin on infrastructure: persistence, notification delivery and
//! the audit trail are external collaborators reached through the traits in [`traits`], with
//! in-memory implementations in [`memory`]. All policy decisions are pure functions over
//! explicit [`Actor`] and [`Project`] values; there is no ambient "current user" state.
//!
//! ## Structure
//!
//! - [`access`] — pure view/edit/delete/create predicates.
//! - [`filter`] — per-role field filtering for updates, one auditable policy table.
//! - [`assign`] — additive staff assignment, keeping assignment and permission sets in step.
//! - [`workflow`] — the lifecycle finite-state machine.
//! - [`service`] — the orchestrator composing all of the above around the collaborators.

pub mod access;
pub mod actor;
pub mod assign;
pub mod error;
pub mod filter;
pub mod memory;
pub mod project;
pub mod service;
#[cfg(test)]
mod test_utils;
pub mod traits;
pub mod workflow;

pub use access::{Capability, can_create, can_delete, can_edit, can_view};
pub use actor::{Actor, IdentityHandle, Role};
pub use assign::{Assignment, assign_staff};
pub use error::EngineError;
pub use filter::filter_update;
pub use project::{FieldName, Permissions, Project, ProjectUpdate, Timeline};
pub use service::{CreateProject, ProjectFilter, ProjectService, ServiceConfig, ServiceError};
pub use traits::{
    Activity, ActivityRecord, AuditLog, Notification, NotificationSink, ProjectStore, QueryScope,
};
pub use workflow::{Status, change_status};

// SPDX-License-Identifier: MIT OR Apache-2.0

//! The project orchestrator.
//!
//! [`ProjectService`] composes the permission evaluator, update filter, assignment manager and
//! status workflow around the storage, notification and audit collaborators. Every successful
//! mutating operation ends with exactly one audit record; failed operations are never partially
//! applied and leave no audit trace.

use std::fmt::Display;
use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::warn;

use crate::access::{self, Capability};
use crate::actor::{Actor, IdentityHandle, Role};
use crate::assign::{self, Assignment};
use crate::error::EngineError;
use crate::filter::filter_update;
use crate::project::{Project, ProjectUpdate, Timeline};
use crate::traits::{
    Activity, ActivityRecord, AuditLog, Notification, NotificationSink, ProjectStore, QueryScope,
};
use crate::workflow::{self, Status};

/// Failures of orchestrated operations: either an engine-level rejection or a collaborator
/// error. Notification delivery failures never appear here; they are logged and swallowed.
#[derive(Debug, Error)]
pub enum ServiceError<ID, SE, AE>
where
    ID: IdentityHandle,
    SE: std::error::Error,
    AE: std::error::Error,
{
    #[error(transparent)]
    Engine(#[from] EngineError<ID>),

    #[error("project store: {0}")]
    Store(SE),

    #[error("audit log: {0}")]
    Audit(AE),
}

/// Explicit configuration for the orchestrator, passed in at construction.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Base path or URL under which the integrating UI exposes projects; used to build
    /// notification action URLs.
    pub action_url_base: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            action_url_base: "/projects".to_string(),
        }
    }
}

impl ServiceConfig {
    fn project_url<ID>(&self, id: &ID) -> String
    where
        ID: Display,
    {
        format!("{}/{}", self.action_url_base.trim_end_matches('/'), id)
    }
}

/// Request payload for project creation.
///
/// Identifiers are opaque to the engine, so the boundary layer mints the project id. Admins
/// creating a project on behalf of a client must name that client in `client_id`; for client
/// creators the field is ignored and the creator becomes the owning client.
#[derive(Clone, Debug)]
pub struct CreateProject<ID>
where
    ID: IdentityHandle,
{
    pub id: ID,
    pub title: String,
    pub description: String,
    pub client_id: Option<ID>,
    pub company_id: ID,
    pub project_manager: ID,
    pub staff: Vec<ID>,
    pub timeline: Timeline,
    pub budget: Option<u64>,
}

/// Optional narrowing of a project listing, applied after role-based scoping.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProjectFilter {
    pub status: Option<Status>,
}

/// Orchestrates the public project operations over the three collaborators.
pub struct ProjectService<ID, S, N, A>
where
    ID: IdentityHandle,
    S: ProjectStore<ID>,
    N: NotificationSink<ID>,
    A: AuditLog<ID>,
{
    store: S,
    notifications: N,
    audit: A,
    config: ServiceConfig,
    _phantom: PhantomData<ID>,
}

impl<ID, S, N, A> ProjectService<ID, S, N, A>
where
    ID: IdentityHandle,
    S: ProjectStore<ID>,
    N: NotificationSink<ID>,
    A: AuditLog<ID>,
{
    pub fn new(store: S, notifications: N, audit: A, config: ServiceConfig) -> Self {
        Self {
            store,
            notifications,
            audit,
            config,
            _phantom: PhantomData,
        }
    }

    /// Create a new project in the `Planning` state.
    ///
    /// Requires a client or admin actor. The owning client and any staff named in the request
    /// are granted their initial permissions; named staff are assigned immediately.
    pub async fn create_project(
        &mut self,
        request: CreateProject<ID>,
        actor: &Actor<ID>,
    ) -> Result<Project<ID>, ServiceError<ID, S::Error, A::Error>> {
        if !access::can_create(actor) {
            return Err(EngineError::AccessDenied {
                actor: actor.id,
                capability: Capability::Create,
            }
            .into());
        }

        let now = unix_now();
        let client_id = match actor.role {
            Role::Client => actor.id,
            _ => request
                .client_id
                .ok_or(EngineError::MissingClient(actor.id))?,
        };

        let mut project = Project::new(
            request.id,
            client_id,
            request.company_id,
            request.project_manager,
            now,
        );
        project.title = request.title;
        project.description = request.description;
        project.timeline = request.timeline;
        project.budget = request.budget;

        if actor.role.is_admin() {
            project.permissions.grant_working_access(actor.id);
        } else {
            project.permissions.grant_view_comment(actor.id);
        }

        for staff_id in request.staff {
            project.assigned_staff.insert(staff_id);
            project.permissions.grant_working_access(staff_id);
        }

        let project = self
            .store
            .insert(project)
            .await
            .map_err(ServiceError::Store)?;

        self.append_audit(actor.id, Activity::Created, project.id, now)
            .await?;

        Ok(project)
    }

    /// List the projects visible to the actor.
    ///
    /// The scope is derived from the role alone: clients see their own projects, staff the
    /// projects they are assigned to, admins every project of their company. The filter only
    /// ever narrows the scoped result.
    pub async fn get_projects(
        &self,
        actor: &Actor<ID>,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project<ID>>, ServiceError<ID, S::Error, A::Error>> {
        let scope = match actor.role {
            Role::Client => QueryScope::Client(actor.id),
            Role::Staff { .. } => QueryScope::Staff(actor.id),
            Role::Admin { company_id } => QueryScope::Company(company_id),
        };

        let mut projects = self
            .store
            .query(&scope)
            .await
            .map_err(ServiceError::Store)?;

        if let Some(status) = filter.status {
            projects.retain(|project| project.status == status);
        }

        Ok(projects)
    }

    /// Fetch a single project, gated on view access.
    ///
    /// `NotFound` and `AccessDenied` are reported as distinct kinds; whether to conflate them
    /// towards unauthorised callers is the integrating API layer's decision.
    pub async fn get_project(
        &self,
        id: &ID,
        actor: &Actor<ID>,
    ) -> Result<Project<ID>, ServiceError<ID, S::Error, A::Error>> {
        let project = self.fetch(id).await?;

        if !access::can_view(&project, actor) {
            return Err(EngineError::AccessDenied {
                actor: actor.id,
                capability: Capability::View,
            }
            .into());
        }

        Ok(project)
    }

    /// Apply a field update to a project.
    ///
    /// The update is filtered per the actor's role before anything reaches the store; an update
    /// that filters down to empty is still persisted as a no-op write. A surviving status field
    /// is validated against the workflow transition table.
    pub async fn update_project(
        &mut self,
        id: &ID,
        update: ProjectUpdate<ID>,
        actor: &Actor<ID>,
    ) -> Result<Project<ID>, ServiceError<ID, S::Error, A::Error>> {
        let mut project = self.fetch(id).await?;

        if !access::can_edit(&project, actor) {
            return Err(EngineError::AccessDenied {
                actor: actor.id,
                capability: Capability::Edit,
            }
            .into());
        }

        let update = filter_update(update, actor);

        if let Some(next) = update.status {
            workflow::check_transition(&project, next, actor)?;
        }

        let now = unix_now();
        let fields = update.fields();
        update.apply_to(&mut project, now);

        let project = self
            .store
            .update(project)
            .await
            .map_err(ServiceError::Store)?;

        self.append_audit(actor.id, Activity::Updated { fields }, *id, now)
            .await?;

        Ok(project)
    }

    /// Assign staff to a project and notify the newly assigned.
    ///
    /// Staff already assigned before the call are neither re-granted nor re-notified; see
    /// [`assign::assign_staff`] for the underlying set semantics.
    pub async fn assign_staff_to_project(
        &mut self,
        id: &ID,
        staff_ids: &[ID],
        actor: &Actor<ID>,
    ) -> Result<Assignment<ID>, ServiceError<ID, S::Error, A::Error>> {
        let project = self.fetch(id).await?;

        let now = unix_now();
        let Assignment {
            project,
            newly_assigned,
        } = assign::assign_staff(project, staff_ids, actor, now)?;

        let project = self
            .store
            .update(project)
            .await
            .map_err(ServiceError::Store)?;

        for staff_id in &newly_assigned {
            self.notify(
                *staff_id,
                "New project assignment",
                format!("You have been assigned to \"{}\"", project.title),
                project.id,
            )
            .await;
        }

        self.append_audit(
            actor.id,
            Activity::StaffAssigned {
                newly_assigned: newly_assigned.clone(),
            },
            *id,
            now,
        )
        .await?;

        Ok(Assignment {
            project,
            newly_assigned,
        })
    }

    /// Move a project into a new lifecycle state and notify its stakeholders.
    pub async fn change_project_status(
        &mut self,
        id: &ID,
        next: Status,
        actor: &Actor<ID>,
        comment: Option<String>,
    ) -> Result<Project<ID>, ServiceError<ID, S::Error, A::Error>> {
        let project = self.fetch(id).await?;
        let from = project.status;

        let now = unix_now();
        let project = workflow::change_status(project, next, actor, now)?;

        let project = self
            .store
            .update(project)
            .await
            .map_err(ServiceError::Store)?;

        for recipient in project.stakeholders(&actor.id) {
            self.notify(
                recipient,
                "Project status updated",
                format!("\"{}\" moved from {} to {}", project.title, from, next),
                project.id,
            )
            .await;
        }

        self.append_audit(
            actor.id,
            Activity::StatusChanged {
                from,
                to: next,
                comment,
            },
            *id,
            now,
        )
        .await?;

        Ok(project)
    }

    /// Hard-delete a project. Admin-only and company-scoped.
    pub async fn delete_project(
        &mut self,
        id: &ID,
        actor: &Actor<ID>,
    ) -> Result<(), ServiceError<ID, S::Error, A::Error>> {
        if !access::can_delete(actor) {
            return Err(EngineError::AccessDenied {
                actor: actor.id,
                capability: Capability::Delete,
            }
            .into());
        }

        let project = self.fetch(id).await?;

        if actor.role.company_id() != Some(project.company_id) {
            return Err(EngineError::CompanyMismatch {
                actor: actor.id,
                project: project.id,
            }
            .into());
        }

        let removed = self.store.delete(id).await.map_err(ServiceError::Store)?;
        if !removed {
            return Err(EngineError::NotFound(*id).into());
        }

        self.append_audit(actor.id, Activity::Deleted, *id, unix_now())
            .await?;

        Ok(())
    }

    async fn fetch(&self, id: &ID) -> Result<Project<ID>, ServiceError<ID, S::Error, A::Error>> {
        self.store
            .get(id)
            .await
            .map_err(ServiceError::Store)?
            .ok_or_else(|| EngineError::NotFound(*id).into())
    }

    /// Best-effort notification delivery. Failures are logged and swallowed; they never roll
    /// back the already-persisted mutation or fail the triggering operation.
    async fn notify(&mut self, recipient_id: ID, title: &str, message: String, project_id: ID) {
        let notification = Notification {
            recipient_id,
            title: title.to_string(),
            message,
            project_id,
            action_url: self.config.project_url(&project_id),
        };

        if let Err(err) = self.notifications.send(notification).await {
            warn!(
                recipient = %recipient_id,
                project = %project_id,
                "dropping undeliverable notification: {err}"
            );
        }
    }

    async fn append_audit(
        &mut self,
        actor_id: ID,
        action: Activity<ID>,
        project_id: ID,
        now: u64,
    ) -> Result<(), ServiceError<ID, S::Error, A::Error>> {
        self.audit
            .append(ActivityRecord {
                actor_id,
                action,
                project_id,
                timestamp: now,
            })
            .await
            .map_err(ServiceError::Audit)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::access::Capability;
    use crate::error::EngineError;
    use crate::memory::{MemoryAuditLog, MemoryNotificationSink, MemoryProjectStore};
    use crate::project::{ProjectUpdate, Timeline};
    use crate::test_utils::{admin, client, staff};
    use crate::traits::{Activity, Notification, NotificationSink, ProjectStore};
    use crate::workflow::Status;

    use super::{CreateProject, ProjectFilter, ProjectService, ServiceConfig, ServiceError};

    type TestService<N = MemoryNotificationSink<char>> =
        ProjectService<char, MemoryProjectStore<char>, N, MemoryAuditLog<char>>;

    fn service() -> (
        TestService,
        MemoryNotificationSink<char>,
        MemoryAuditLog<char>,
    ) {
        let sink = MemoryNotificationSink::new();
        let log = MemoryAuditLog::new();
        let service = ProjectService::new(
            MemoryProjectStore::new(),
            sink.clone(),
            log.clone(),
            ServiceConfig::default(),
        );

        (service, sink, log)
    }

    fn request(id: char, company: char, manager: char) -> CreateProject<char> {
        CreateProject {
            id,
            title: "Launch film".to_string(),
            description: "Teaser and main cut".to_string(),
            client_id: None,
            company_id: company,
            project_manager: manager,
            staff: Vec::new(),
            timeline: Timeline::default(),
            budget: None,
        }
    }

    fn recipients(sent: &[Notification<char>]) -> HashSet<char> {
        sent.iter().map(|n| n.recipient_id).collect()
    }

    #[tokio::test]
    async fn client_self_service_lifecycle() {
        let (mut service, sink, log) = service();
        let carol = client('C');
        let alice = admin('A', 'X');

        // Carol requests a project herself.
        let project = service
            .create_project(request('P', 'X', 'A'), &carol)
            .await
            .unwrap();
        assert_eq!(project.status, Status::Planning);
        assert_eq!(project.client_id, 'C');

        // Alice kicks it off.
        let project = service
            .change_project_status(&'P', Status::InProgress, &alice, None)
            .await
            .unwrap();
        assert_eq!(project.status, Status::InProgress);

        // Sam is brought on board and notified exactly once.
        let sent_before = sink.sent().len();
        let assignment = service
            .assign_staff_to_project(&'P', &['S'], &alice)
            .await
            .unwrap();
        assert_eq!(assignment.newly_assigned, vec!['S']);

        let sent = sink.sent();
        assert_eq!(sent.len(), sent_before + 1);
        assert_eq!(sent.last().unwrap().recipient_id, 'S');
        assert_eq!(sent.last().unwrap().action_url, "/projects/P");

        // Wrap-up: completion timestamp is set and everyone except Alice hears about it.
        let sent_before = sink.sent().len();
        let project = service
            .change_project_status(&'P', Status::Completed, &alice, Some("done".to_string()))
            .await
            .unwrap();
        assert_eq!(project.status, Status::Completed);
        assert!(project.completed_at.is_some());
        assert_eq!(project.timeline.actual_hours, Some(0));

        assert_eq!(
            recipients(&sink.sent()[sent_before..]),
            HashSet::from(['C', 'S'])
        );

        // One audit record per mutation, in order.
        let actions: Vec<_> = log.entries().into_iter().map(|e| e.action).collect();
        assert!(matches!(actions[0], Activity::Created));
        assert!(matches!(
            actions[1],
            Activity::StatusChanged {
                from: Status::Planning,
                to: Status::InProgress,
                ..
            }
        ));
        assert!(matches!(actions[2], Activity::StaffAssigned { .. }));
        assert!(matches!(
            actions[3],
            Activity::StatusChanged {
                from: Status::InProgress,
                to: Status::Completed,
                ..
            }
        ));
        assert_eq!(actions.len(), 4);
    }

    #[tokio::test]
    async fn staff_with_edit_access_cannot_cancel() {
        let (mut service, _, _) = service();
        let alice = admin('A', 'X');
        let sam = staff('S', 'X');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();
        service
            .assign_staff_to_project(&'P', &['S'], &alice)
            .await
            .unwrap();
        service
            .change_project_status(&'P', Status::InProgress, &alice, None)
            .await
            .unwrap();

        // Sam holds edit access through assignment, but cancellation is admin-only.
        let result = service
            .change_project_status(&'P', Status::Cancelled, &sam, None)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::InvalidTransition {
                from: Status::InProgress,
                to: Status::Cancelled,
            }))
        ));

        let project = service.get_project(&'P', &sam).await.unwrap();
        assert_eq!(project.status, Status::InProgress);
    }

    #[tokio::test]
    async fn listings_are_scoped_by_role() {
        let (mut service, _, _) = service();
        let alice = admin('A', 'X');
        let bert = admin('B', 'Y');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();
        service
            .create_project(request('Q', 'X', 'A'), &client('D'))
            .await
            .unwrap();
        service
            .create_project(request('R', 'Y', 'B'), &client('E'))
            .await
            .unwrap();
        service
            .assign_staff_to_project(&'Q', &['S'], &alice)
            .await
            .unwrap();

        let ids = |projects: Vec<crate::project::Project<char>>| -> HashSet<char> {
            projects.into_iter().map(|p| p.id).collect()
        };

        // Clients see their own projects only.
        let listed = service
            .get_projects(&client('C'), &ProjectFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(listed), HashSet::from(['P']));

        // Staff see what they are assigned to.
        let listed = service
            .get_projects(&staff('S', 'X'), &ProjectFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(listed), HashSet::from(['Q']));

        // Admins see their whole company and nothing beyond it.
        let listed = service
            .get_projects(&alice, &ProjectFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(listed), HashSet::from(['P', 'Q']));

        let listed = service
            .get_projects(&bert, &ProjectFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(listed), HashSet::from(['R']));

        // Filters narrow the scoped listing, never widen it.
        service
            .change_project_status(&'P', Status::InProgress, &alice, None)
            .await
            .unwrap();
        let filter = ProjectFilter {
            status: Some(Status::InProgress),
        };
        let listed = service.get_projects(&alice, &filter).await.unwrap();
        assert_eq!(ids(listed), HashSet::from(['P']));
    }

    #[tokio::test]
    async fn missing_and_hidden_projects_are_distinct_kinds() {
        let (mut service, _, _) = service();

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();

        let result = service.get_project(&'Z', &client('C')).await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::NotFound('Z')))
        ));

        let result = service.get_project(&'P', &client('D')).await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::AccessDenied {
                actor: 'D',
                capability: Capability::View,
            }))
        ));
    }

    /// Grant a client edit access directly in the store. Permission grants beyond staff
    /// assignment are not an update-path concern, so tests seed them out of band.
    async fn grant_edit(store: &MemoryProjectStore<char>, project_id: char, actor_id: char) {
        let mut project = store.get(&project_id).await.unwrap().unwrap();
        project.permissions.edit_access.insert(actor_id);
        store.clone().update(project).await.unwrap();
    }

    #[tokio::test]
    async fn client_updates_are_filtered_before_persisting() {
        let store = MemoryProjectStore::new();
        let log = MemoryAuditLog::new();
        let mut service = ProjectService::new(
            store.clone(),
            MemoryNotificationSink::new(),
            log.clone(),
            ServiceConfig::default(),
        );
        let carol = client('C');

        service
            .create_project(request('P', 'X', 'A'), &carol)
            .await
            .unwrap();
        grant_edit(&store, 'P', 'C').await;

        let updated = service
            .update_project(
                &'P',
                ProjectUpdate {
                    status: Some(Status::Completed),
                    description: Some("x".to_string()),
                    budget: Some(99),
                    ..Default::default()
                },
                &carol,
            )
            .await
            .unwrap();

        // Only the description survives the client's allow-list.
        assert_eq!(updated.description, "x");
        assert_eq!(updated.budget, None);
        assert_eq!(updated.status, Status::Planning);

        let last = log.entries().pop().unwrap();
        assert_eq!(
            last.action,
            Activity::Updated {
                fields: vec![crate::project::FieldName::Description],
            }
        );
    }

    #[tokio::test]
    async fn empty_filtered_update_is_a_noop_write() {
        let store = MemoryProjectStore::new();
        let log = MemoryAuditLog::new();
        let mut service = ProjectService::new(
            store.clone(),
            MemoryNotificationSink::new(),
            log.clone(),
            ServiceConfig::default(),
        );
        let carol = client('C');

        service
            .create_project(request('P', 'X', 'A'), &carol)
            .await
            .unwrap();
        grant_edit(&store, 'P', 'C').await;

        // Everything Carol proposes is disallowed for her role; the write goes through as a
        // no-op rather than an error, and is still audited.
        let before = service.get_project(&'P', &carol).await.unwrap();
        let updated = service
            .update_project(
                &'P',
                ProjectUpdate {
                    budget: Some(99),
                    ..Default::default()
                },
                &carol,
            )
            .await
            .unwrap();

        assert_eq!(updated.budget, before.budget);
        assert_eq!(updated.title, before.title);
        assert_eq!(
            log.entries().pop().unwrap().action,
            Activity::Updated { fields: vec![] }
        );
    }

    #[tokio::test]
    async fn update_path_respects_workflow_transitions() {
        let (mut service, _, _) = service();
        let alice = admin('A', 'X');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();

        // Admin updates pass the filter untouched, but a status field still has to be a legal
        // transition.
        let result = service
            .update_project(
                &'P',
                ProjectUpdate {
                    status: Some(Status::Completed),
                    ..Default::default()
                },
                &alice,
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::InvalidTransition {
                from: Status::Planning,
                to: Status::Completed,
            }))
        ));

        let updated = service
            .update_project(
                &'P',
                ProjectUpdate {
                    status: Some(Status::InProgress),
                    ..Default::default()
                },
                &alice,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, Status::InProgress);
    }

    #[tokio::test]
    async fn admin_updates_naming_staff_keep_permission_sets_consistent() {
        let (mut service, _, _) = service();
        let alice = admin('A', 'X');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();
        service
            .assign_staff_to_project(&'P', &['S'], &alice)
            .await
            .unwrap();

        // An admin names additional staff straight through the update path.
        let updated = service
            .update_project(
                &'P',
                ProjectUpdate {
                    title: Some("Extended cut".to_string()),
                    assigned_staff: Some(HashSet::from(['T'])),
                    ..Default::default()
                },
                &alice,
            )
            .await
            .unwrap();

        // Whoever is assigned holds full working access, whichever path assigned them.
        assert_eq!(updated.assigned_staff, HashSet::from(['S', 'T']));
        for id in ['S', 'T'] {
            assert!(updated.permissions.view_access.contains(&id));
            assert!(updated.permissions.edit_access.contains(&id));
            assert!(updated.permissions.comment_access.contains(&id));
        }

        // The owning client never loses view and comment access.
        assert_eq!(updated.client_id, 'C');
        assert!(updated.permissions.view_access.contains(&'C'));
        assert!(updated.permissions.comment_access.contains(&'C'));

        // The newly named staffer can exercise the edit access they were granted.
        let result = service
            .update_project(
                &'P',
                ProjectUpdate {
                    description: Some("pickup shots scheduled".to_string()),
                    ..Default::default()
                },
                &staff('T', 'X'),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn staff_cannot_assign_through_the_update_path() {
        let (mut service, _, _) = service();
        let alice = admin('A', 'X');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();
        service
            .assign_staff_to_project(&'P', &['S'], &alice)
            .await
            .unwrap();

        // Sam holds edit access but the assignment field is filtered for staff.
        let updated = service
            .update_project(
                &'P',
                ProjectUpdate {
                    assigned_staff: Some(HashSet::from(['Z'])),
                    budget: Some(800),
                    ..Default::default()
                },
                &staff('S', 'X'),
            )
            .await
            .unwrap();

        assert!(!updated.assigned_staff.contains(&'Z'));
        assert!(!updated.permissions.edit_access.contains(&'Z'));
        assert_eq!(updated.budget, Some(800));
    }

    #[tokio::test]
    async fn admin_creation_requires_a_named_client() {
        let (mut service, _, log) = service();

        // request() leaves client_id unset; an admin creator must name the owning client.
        let result = service
            .create_project(request('P', 'X', 'A'), &admin('A', 'X'))
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::MissingClient('A')))
        ));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn deletion_is_company_scoped() {
        let (mut service, _, log) = service();
        let alice = admin('A', 'X');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();

        let result = service.delete_project(&'P', &staff('S', 'X')).await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::AccessDenied {
                capability: Capability::Delete,
                ..
            }))
        ));

        let result = service.delete_project(&'P', &admin('B', 'Y')).await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::CompanyMismatch {
                actor: 'B',
                project: 'P',
            }))
        ));

        service.delete_project(&'P', &alice).await.unwrap();
        let result = service.get_project(&'P', &alice).await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::NotFound('P')))
        ));

        assert!(matches!(
            log.entries().last().unwrap().action,
            Activity::Deleted
        ));
    }

    #[tokio::test]
    async fn staff_cannot_create_projects() {
        let (mut service, _, log) = service();

        let result = service
            .create_project(request('P', 'X', 'A'), &staff('S', 'X'))
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::AccessDenied {
                capability: Capability::Create,
                ..
            }))
        ));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn admin_creates_on_behalf_of_client_with_initial_staff() {
        let (mut service, sink, _) = service();
        let alice = admin('A', 'X');

        let mut create = request('P', 'X', 'A');
        create.client_id = Some('C');
        create.staff = vec!['S'];

        let project = service.create_project(create, &alice).await.unwrap();
        assert_eq!(project.client_id, 'C');
        assert!(project.assigned_staff.contains(&'S'));
        assert!(project.permissions.view_access.is_superset(&HashSet::from(['C', 'S', 'A'])));
        assert!(project.permissions.edit_access.is_superset(&HashSet::from(['S', 'A'])));
        assert!(project.permissions.comment_access.contains(&'C'));

        // Creation itself notifies nobody; only assignment and status changes fan out.
        assert!(sink.sent().is_empty());
    }

    /// A sink whose deliveries always fail, for exercising the best-effort contract.
    #[derive(Clone, Debug)]
    struct OfflineSink;

    #[derive(Debug, thiserror::Error)]
    #[error("sink offline")]
    struct SinkOffline;

    impl NotificationSink<char> for OfflineSink {
        type Error = SinkOffline;

        async fn send(&mut self, _notification: Notification<char>) -> Result<(), Self::Error> {
            Err(SinkOffline)
        }
    }

    #[tokio::test]
    async fn undeliverable_notifications_do_not_fail_the_operation() {
        let log = MemoryAuditLog::new();
        let mut service: TestService<OfflineSink> = ProjectService::new(
            MemoryProjectStore::new(),
            OfflineSink,
            log.clone(),
            ServiceConfig::default(),
        );
        let alice = admin('A', 'X');

        service
            .create_project(request('P', 'X', 'A'), &client('C'))
            .await
            .unwrap();

        let assignment = service
            .assign_staff_to_project(&'P', &['S'], &alice)
            .await
            .unwrap();
        assert_eq!(assignment.newly_assigned, vec!['S']);

        // The mutation and its audit record survive the delivery failure.
        let project = service.get_project(&'P', &alice).await.unwrap();
        assert!(project.assigned_staff.contains(&'S'));
        assert!(matches!(
            log.entries().last().unwrap().action,
            Activity::StaffAssigned { .. }
        ));
    }
}

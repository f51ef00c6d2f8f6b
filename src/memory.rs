// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborator implementations.
//!
//! These back the test suite and double as reference implementations of the collaborator
//! contracts. Each wraps its state in an `Arc<RwLock<…>>` so clones share state across
//! asynchronous and multi-threaded contexts, with convenience methods to obtain a read- or
//! write-lock.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::actor::IdentityHandle;
use crate::project::Project;
use crate::traits::{
    ActivityRecord, AuditLog, Notification, NotificationSink, ProjectStore, QueryScope,
};

/// An in-memory project document store.
#[derive(Clone, Debug)]
pub struct MemoryProjectStore<ID>
where
    ID: IdentityHandle,
{
    inner: Arc<RwLock<HashMap<ID, Project<ID>>>>,
}

impl<ID> MemoryProjectStore<ID>
where
    ID: IdentityHandle,
{
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Obtain a read-lock on the store.
    fn read_store(&self) -> RwLockReadGuard<'_, HashMap<ID, Project<ID>>> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    fn write_store(&self) -> RwLockWriteGuard<'_, HashMap<ID, Project<ID>>> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }
}

impl<ID> Default for MemoryProjectStore<ID>
where
    ID: IdentityHandle,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> ProjectStore<ID> for MemoryProjectStore<ID>
where
    ID: IdentityHandle,
{
    type Error = Infallible;

    async fn get(&self, id: &ID) -> Result<Option<Project<ID>>, Self::Error> {
        Ok(self.read_store().get(id).cloned())
    }

    async fn insert(&mut self, project: Project<ID>) -> Result<Project<ID>, Self::Error> {
        self.write_store().insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&mut self, project: Project<ID>) -> Result<Project<ID>, Self::Error> {
        self.write_store().insert(project.id, project.clone());
        Ok(project)
    }

    async fn query(&self, scope: &QueryScope<ID>) -> Result<Vec<Project<ID>>, Self::Error> {
        let mut projects: Vec<Project<ID>> = self
            .read_store()
            .values()
            .filter(|project| scope.matches(project))
            .cloned()
            .collect();

        projects.sort_by_key(|project| project.created_at);
        Ok(projects)
    }

    async fn delete(&mut self, id: &ID) -> Result<bool, Self::Error> {
        Ok(self.write_store().remove(id).is_some())
    }
}

/// A notification sink collecting everything it is asked to deliver.
#[derive(Clone, Debug)]
pub struct MemoryNotificationSink<ID>
where
    ID: IdentityHandle,
{
    inner: Arc<RwLock<Vec<Notification<ID>>>>,
}

impl<ID> MemoryNotificationSink<ID>
where
    ID: IdentityHandle,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All notifications sent so far, in delivery order.
    pub fn sent(&self) -> Vec<Notification<ID>> {
        self.inner
            .read()
            .expect("acquire shared read access on sink")
            .clone()
    }
}

impl<ID> Default for MemoryNotificationSink<ID>
where
    ID: IdentityHandle,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> NotificationSink<ID> for MemoryNotificationSink<ID>
where
    ID: IdentityHandle,
{
    type Error = Infallible;

    async fn send(&mut self, notification: Notification<ID>) -> Result<(), Self::Error> {
        self.inner
            .write()
            .expect("acquire exclusive write access on sink")
            .push(notification);
        Ok(())
    }
}

/// An append-only in-memory audit trail.
#[derive(Clone, Debug)]
pub struct MemoryAuditLog<ID>
where
    ID: IdentityHandle,
{
    inner: Arc<RwLock<Vec<ActivityRecord<ID>>>>,
}

impl<ID> MemoryAuditLog<ID>
where
    ID: IdentityHandle,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All audit entries appended so far, in order.
    pub fn entries(&self) -> Vec<ActivityRecord<ID>> {
        self.inner
            .read()
            .expect("acquire shared read access on log")
            .clone()
    }
}

impl<ID> Default for MemoryAuditLog<ID>
where
    ID: IdentityHandle,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> AuditLog<ID> for MemoryAuditLog<ID>
where
    ID: IdentityHandle,
{
    type Error = Infallible;

    async fn append(&mut self, record: ActivityRecord<ID>) -> Result<(), Self::Error> {
        self.inner
            .write()
            .expect("acquire exclusive write access on log")
            .push(record);
        Ok(())
    }
}

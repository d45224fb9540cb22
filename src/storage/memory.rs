//! In-memory storage backend
//!
//! Backs both store traits with concurrent maps. Used as the default backend
//! and throughout the test suites; the admin-side mutators here mirror the
//! configuration flows that populate the permission tables.

use super::{SessionStore, UserGroupStore};
use crate::auth::rbac::{Namespace, NamespacePermission, PermissionKind, UserGroup};
use crate::auth::session::Session;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

/// Concurrent in-memory backend for sessions, groups and permissions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sessions: DashMap<String, Session>,
    namespaces: DashMap<String, Namespace>,
    user_groups: DashMap<String, UserGroup>,
    // Keyed by (group name, namespace name); insertion is last-write-wins,
    // matching the uniqueness invariant on the relational table.
    permissions: DashMap<(String, String), PermissionKind>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a namespace
    pub fn upsert_namespace(&self, namespace: Namespace) {
        self.namespaces.insert(namespace.name.clone(), namespace);
    }

    /// Create or replace a user group
    pub fn upsert_user_group(&self, group: UserGroup) {
        self.user_groups.insert(group.name.clone(), group);
    }

    /// Grant a permission kind to a group on a namespace.
    ///
    /// Replaces any existing grant for the same (group, namespace) pair.
    pub fn set_permission(&self, group: &str, namespace: &str, permission: PermissionKind) {
        self.permissions
            .insert((group.to_string(), namespace.to_string()), permission);
    }

    /// Remove a grant for a (group, namespace) pair
    pub fn remove_permission(&self, group: &str, namespace: &str) {
        self.permissions
            .remove(&(group.to_string(), namespace.to_string()));
    }
}

#[async_trait]
impl SessionStore for MemoryBackend {
    async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn create_session(&self, session: Session) -> Result<()> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - self.sessions.len())
    }
}

#[async_trait]
impl UserGroupStore for MemoryBackend {
    async fn namespace_exists(&self, name: &str) -> Result<bool> {
        Ok(self.namespaces.contains_key(name))
    }

    async fn groups_by_names(&self, names: &[String]) -> Result<Vec<UserGroup>> {
        Ok(names
            .iter()
            .filter_map(|name| self.user_groups.get(name).map(|entry| entry.value().clone()))
            .collect())
    }

    async fn permissions_for_namespace(
        &self,
        groups: &[String],
        namespace: &str,
    ) -> Result<Vec<NamespacePermission>> {
        Ok(self
            .permissions
            .iter()
            .filter(|entry| {
                let (group_name, namespace_name) = entry.key();
                namespace_name == namespace && groups.contains(group_name)
            })
            .map(|entry| NamespacePermission {
                group_name: entry.key().0.clone(),
                namespace: entry.key().1.clone(),
                permission: *entry.value(),
            })
            .collect())
    }

    async fn permissions_for_groups(
        &self,
        groups: &[String],
    ) -> Result<Vec<NamespacePermission>> {
        // Join against existing namespaces: a grant referencing a namespace
        // that has since been removed does not surface.
        Ok(self
            .permissions
            .iter()
            .filter(|entry| {
                let (group_name, namespace_name) = entry.key();
                groups.contains(group_name) && self.namespaces.contains_key(namespace_name)
            })
            .map(|entry| NamespacePermission {
                group_name: entry.key().0.clone(),
                namespace: entry.key().1.clone(),
                permission: *entry.value(),
            })
            .collect())
    }
}

//! Storage boundary for the resolution engine
//!
//! The engine is strictly read-only over sessions and permission rows; the
//! traits here define the interface it consumes, and login/admin flows use
//! the mutating methods. Backends are swappable behind trait objects.

pub mod memory;

use crate::auth::rbac::{NamespacePermission, UserGroup};
use crate::auth::session::Session;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Server-side session persistence
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session by its opaque identifier
    async fn get_session(&self, id: &str) -> Result<Option<Session>>;

    /// Persist a session created by a login flow
    async fn create_session(&self, session: Session) -> Result<()>;

    /// Remove a session at logout
    async fn delete_session(&self, id: &str) -> Result<()>;

    /// Remove expired sessions, returning how many were dropped
    async fn cleanup_expired(&self) -> Result<usize>;
}

/// Group, namespace and permission rows consumed by the RBAC resolver
#[async_trait]
pub trait UserGroupStore: Send + Sync {
    /// Whether a namespace with this name exists
    async fn namespace_exists(&self, name: &str) -> Result<bool>;

    /// Resolve external group names to stored groups; unknown names are
    /// silently absent from the result
    async fn groups_by_names(&self, names: &[String]) -> Result<Vec<UserGroup>>;

    /// Permission rows held by any of the given groups on one namespace
    async fn permissions_for_namespace(
        &self,
        groups: &[String],
        namespace: &str,
    ) -> Result<Vec<NamespacePermission>>;

    /// All permission rows held by the given groups, joined against
    /// existing namespaces
    async fn permissions_for_groups(&self, groups: &[String])
        -> Result<Vec<NamespacePermission>>;
}

/// Storage layer bundling the backends the engine reads from
#[derive(Clone)]
pub struct StorageLayer {
    /// Session persistence backend
    pub sessions: Arc<dyn SessionStore>,
    /// Group/namespace/permission backend
    pub user_groups: Arc<dyn UserGroupStore>,
}

impl StorageLayer {
    /// Create a storage layer over explicit backends
    pub fn new(sessions: Arc<dyn SessionStore>, user_groups: Arc<dyn UserGroupStore>) -> Self {
        Self {
            sessions,
            user_groups,
        }
    }

    /// Create a storage layer backed entirely by memory
    pub fn in_memory() -> (Self, Arc<memory::MemoryBackend>) {
        info!("Initializing in-memory storage backend");
        let backend = Arc::new(memory::MemoryBackend::new());
        let layer = Self::new(backend.clone(), backend.clone());
        (layer, backend)
    }
}

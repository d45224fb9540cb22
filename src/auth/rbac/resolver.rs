//! Namespace permission resolution for SSO sessions

use super::types::PermissionKind;
use crate::storage::UserGroupStore;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves federated group memberships against the stored
/// group/namespace/permission table.
///
/// Only SSO-session strategies consult this; admin and key-based strategies
/// short-circuit before reaching it.
#[derive(Clone)]
pub struct NamespacePermissionResolver {
    store: Arc<dyn UserGroupStore>,
    access_controls_enabled: bool,
}

impl NamespacePermissionResolver {
    /// Create a resolver over the given store
    pub fn new(store: Arc<dyn UserGroupStore>, access_controls_enabled: bool) -> Self {
        Self {
            store,
            access_controls_enabled,
        }
    }

    /// Whether a caller with these group claims is a global administrator.
    ///
    /// With access controls disabled every SSO caller is an admin; otherwise
    /// membership in any stored group flagged `site_admin` grants it.
    pub async fn is_global_admin(&self, groups: &[String]) -> Result<bool> {
        if !self.access_controls_enabled {
            return Ok(true);
        }
        if groups.is_empty() {
            return Ok(false);
        }
        let matched = self.store.groups_by_names(groups).await?;
        Ok(matched.iter().any(|group| group.site_admin))
    }

    /// Whether the caller may act on `namespace` at the requested level.
    ///
    /// Global admins pass unconditionally, before the namespace is even
    /// resolved. For everyone else a namespace that does not exist always
    /// denies; unmatched external groups are ignored; and any held row whose
    /// kind satisfies the request (with `Full` dominating) grants access.
    pub async fn check_namespace_access(
        &self,
        groups: &[String],
        requested: PermissionKind,
        namespace: &str,
    ) -> Result<bool> {
        if self.is_global_admin(groups).await? {
            return Ok(true);
        }

        if !self.store.namespace_exists(namespace).await? {
            debug!(namespace, "permission check against unknown namespace");
            return Ok(false);
        }

        let matched = self.store.groups_by_names(groups).await?;
        if matched.is_empty() {
            return Ok(false);
        }

        let names: Vec<String> = matched.into_iter().map(|group| group.name).collect();
        let rows = self
            .store
            .permissions_for_namespace(&names, namespace)
            .await?;

        Ok(rows.iter().any(|row| row.permission.satisfies(requested)))
    }

    /// Map every namespace the caller's groups can reach to the strongest
    /// permission kind held on it.
    pub async fn all_namespace_permissions(
        &self,
        groups: &[String],
    ) -> Result<HashMap<String, PermissionKind>> {
        if groups.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = self.store.permissions_for_groups(groups).await?;
        let mut permissions: HashMap<String, PermissionKind> = HashMap::new();
        for row in rows {
            permissions
                .entry(row.namespace)
                .and_modify(|kind| *kind = (*kind).max(row.permission))
                .or_insert(row.permission);
        }
        Ok(permissions)
    }
}

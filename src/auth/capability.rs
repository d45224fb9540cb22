//! Capability contract for authentication outcomes
//!
//! Every strategy implements this trait; the default bodies encode the
//! baseline a matched strategy inherits, so each mechanism overrides only
//! what differs from it.

use crate::auth::rbac::PermissionKind;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Query surface exposed by a resolved authentication outcome.
///
/// Defaults: a matched strategy is authenticated but holds no privileges —
/// not an admin, no publish/upload rights, no namespace permissions, no
/// read-API access — and Terraform API access mirrors read-API access.
/// Analytics are recorded unless a strategy opts out. Queries that join
/// against storage are async and surface storage errors to the caller.
#[async_trait]
pub trait AuthCapability: Send + Sync {
    /// Display name of the authenticated principal, when one is known
    fn username(&self) -> Option<String> {
        None
    }

    /// Whether this outcome is the built-in administrator
    fn is_built_in_admin(&self) -> bool {
        false
    }

    /// Whether this outcome holds global admin rights
    async fn is_admin(&self) -> Result<bool> {
        Ok(false)
    }

    /// Whether the caller's identity was established.
    ///
    /// True for every strategy except the anonymous terminal.
    fn is_authenticated(&self) -> bool {
        true
    }

    /// Whether state-changing endpoints must verify a CSRF token.
    ///
    /// Only cookie-session mechanisms are exposed to cross-site requests.
    fn requires_csrf_tokens(&self) -> bool {
        false
    }

    /// Whether the caller may publish module versions in `namespace`
    async fn can_publish_module_version(&self, namespace: &str) -> Result<bool> {
        let _ = namespace;
        Ok(false)
    }

    /// Whether the caller may upload module versions in `namespace`
    async fn can_upload_module_version(&self, namespace: &str) -> Result<bool> {
        let _ = namespace;
        Ok(false)
    }

    /// Whether the caller holds `permission` (or a dominating kind) on
    /// `namespace`
    async fn check_namespace_access(
        &self,
        permission: PermissionKind,
        namespace: &str,
    ) -> Result<bool> {
        let _ = (permission, namespace);
        Ok(false)
    }

    /// Every namespace the caller can reach, mapped to the strongest
    /// permission kind held on it
    async fn all_namespace_permissions(&self) -> Result<HashMap<String, PermissionKind>> {
        Ok(HashMap::new())
    }

    /// Whether the caller may use the registry's read API
    fn can_access_read_api(&self) -> bool {
        false
    }

    /// Whether the caller may use the Terraform protocol API
    fn can_access_terraform_api(&self) -> bool {
        self.can_access_read_api()
    }

    /// Whether requests under this outcome are recorded in analytics
    fn should_record_analytics(&self) -> bool {
        true
    }

    /// The Terraform bearer token this outcome was authenticated with
    fn terraform_auth_token(&self) -> Option<&str> {
        None
    }
}

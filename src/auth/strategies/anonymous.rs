//! Anonymous terminal strategy
//!
//! Always enabled and always matching, so the resolution chain can never
//! fail to produce an outcome. Everything it grants is conditional on the
//! absence of a competing control.

use crate::auth::capability::AuthCapability;
use crate::config::AuthConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome for requests no privileged strategy claimed
#[derive(Clone)]
pub struct AnonymousAuth {
    config: Arc<AuthConfig>,
}

impl AnonymousAuth {
    /// The terminal strategy always participates
    pub fn is_enabled(_config: &AuthConfig) -> bool {
        true
    }

    /// The terminal strategy matches every request
    pub fn matches_request() -> bool {
        true
    }

    /// Create the anonymous outcome
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AuthCapability for AnonymousAuth {
    fn is_authenticated(&self) -> bool {
        false
    }

    async fn can_publish_module_version(&self, _namespace: &str) -> Result<bool> {
        // Granted only as a double negative: configuring publish keys or
        // enabling access controls each immediately revoke it.
        Ok(self.config.publish_api_keys.is_empty() && !self.config.enable_access_controls)
    }

    async fn can_upload_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(self.config.upload_api_keys.is_empty() && !self.config.enable_access_controls)
    }

    fn can_access_read_api(&self) -> bool {
        self.config.allow_unauthenticated_access
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymous(config: AuthConfig) -> AnonymousAuth {
        AnonymousAuth::new(Arc::new(config))
    }

    #[tokio::test]
    async fn test_open_registry_allows_anonymous_publish_and_upload() {
        let outcome = anonymous(AuthConfig::default());
        assert!(!outcome.is_authenticated());
        assert!(outcome.can_publish_module_version("ns").await.unwrap());
        assert!(outcome.can_upload_module_version("ns").await.unwrap());
    }

    #[tokio::test]
    async fn test_publish_keys_revoke_anonymous_publish() {
        let outcome = anonymous(AuthConfig {
            publish_api_keys: vec!["p1".to_string()],
            ..AuthConfig::default()
        });
        assert!(!outcome.can_publish_module_version("ns").await.unwrap());
        // Upload keys are a separate control.
        assert!(outcome.can_upload_module_version("ns").await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_keys_revoke_anonymous_upload() {
        let outcome = anonymous(AuthConfig {
            upload_api_keys: vec!["u1".to_string()],
            ..AuthConfig::default()
        });
        assert!(outcome.can_publish_module_version("ns").await.unwrap());
        assert!(!outcome.can_upload_module_version("ns").await.unwrap());
    }

    #[tokio::test]
    async fn test_access_controls_revoke_both() {
        let outcome = anonymous(AuthConfig {
            enable_access_controls: true,
            ..AuthConfig::default()
        });
        assert!(!outcome.can_publish_module_version("ns").await.unwrap());
        assert!(!outcome.can_upload_module_version("ns").await.unwrap());
    }

    #[test]
    fn test_read_api_follows_global_flag() {
        let open = anonymous(AuthConfig::default());
        assert!(open.can_access_read_api());
        assert!(open.can_access_terraform_api());

        let closed = anonymous(AuthConfig {
            allow_unauthenticated_access: false,
            ..AuthConfig::default()
        });
        assert!(!closed.can_access_read_api());
        assert!(!closed.can_access_terraform_api());
    }

    #[tokio::test]
    async fn test_no_other_privileges() {
        let outcome = anonymous(AuthConfig::default());
        assert!(!outcome.is_admin().await.unwrap());
        assert!(!outcome.is_built_in_admin());
        assert!(outcome.username().is_none());
        assert!(outcome.all_namespace_permissions().await.unwrap().is_empty());
        assert!(
            !outcome
                .check_namespace_access(crate::auth::rbac::PermissionKind::Modify, "ns")
                .await
                .unwrap()
        );
    }
}

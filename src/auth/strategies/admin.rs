//! Built-in administrator strategies
//!
//! Two mechanisms share the configured admin token: presenting it directly
//! in the API-key header, or a password session established by logging in
//! with it.

use crate::auth::RequestCredentials;
use crate::auth::capability::AuthCapability;
use crate::auth::rbac::PermissionKind;
use crate::auth::session::{AuthenticationType, Session, SessionState, check_session};
use crate::config::AuthConfig;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Display name both admin mechanisms report
const BUILT_IN_ADMIN_USERNAME: &str = "Built-in admin";

/// Authenticated by presenting the configured admin token in the API-key
/// header
#[derive(Debug, Clone, Copy)]
pub struct AdminApiKeyAuth;

impl AdminApiKeyAuth {
    /// Whether an admin token is configured
    pub fn is_enabled(config: &AuthConfig) -> bool {
        config.admin_token().is_some()
    }

    /// Match when the API-key header equals the configured admin token
    pub fn matches_request(config: &AuthConfig, credentials: &RequestCredentials) -> bool {
        match (config.admin_token(), credentials.api_key.as_deref()) {
            (Some(token), Some(provided)) => token == provided,
            _ => false,
        }
    }
}

#[async_trait]
impl AuthCapability for AdminApiKeyAuth {
    fn username(&self) -> Option<String> {
        Some(BUILT_IN_ADMIN_USERNAME.to_string())
    }

    fn is_built_in_admin(&self) -> bool {
        true
    }

    async fn is_admin(&self) -> Result<bool> {
        Ok(true)
    }

    async fn can_publish_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(true)
    }

    async fn can_upload_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(true)
    }

    async fn check_namespace_access(
        &self,
        _permission: PermissionKind,
        _namespace: &str,
    ) -> Result<bool> {
        Ok(true)
    }

    fn can_access_read_api(&self) -> bool {
        true
    }
}

/// Authenticated by a password session created with the admin token
#[derive(Debug, Clone, Copy)]
pub struct AdminSessionAuth;

impl AdminSessionAuth {
    /// Whether an admin token is configured
    pub fn is_enabled(config: &AuthConfig) -> bool {
        config.admin_token().is_some()
    }

    /// Match when a valid password session accompanies the request
    pub fn matches_request(config: &AuthConfig, session: Option<&Session>) -> bool {
        check_session(
            config.secret_key_configured(),
            session,
            AuthenticationType::SessionPassword,
        ) == SessionState::Valid
    }
}

#[async_trait]
impl AuthCapability for AdminSessionAuth {
    fn username(&self) -> Option<String> {
        Some(BUILT_IN_ADMIN_USERNAME.to_string())
    }

    fn is_built_in_admin(&self) -> bool {
        true
    }

    async fn is_admin(&self) -> Result<bool> {
        Ok(true)
    }

    fn requires_csrf_tokens(&self) -> bool {
        true
    }

    async fn can_publish_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(true)
    }

    async fn can_upload_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(true)
    }

    async fn check_namespace_access(
        &self,
        _permission: PermissionKind,
        _namespace: &str,
    ) -> Result<bool> {
        Ok(true)
    }

    fn can_access_read_api(&self) -> bool {
        true
    }
}

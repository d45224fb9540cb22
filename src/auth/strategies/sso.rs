//! Federated SSO session strategies
//!
//! SAML and OpenID Connect sessions share one capability payload; they
//! differ only in the session discriminator they accept and in the OpenID
//! Connect re-validation of the stored ID token. All privilege questions are
//! answered through the namespace permission resolver.

use crate::auth::capability::AuthCapability;
use crate::auth::rbac::{NamespacePermissionResolver, PermissionKind};
use crate::auth::session::{AuthenticationType, Session, SessionState, check_session};
use crate::config::AuthConfig;
use crate::provider::SsoProviders;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authenticated by a valid federated session.
///
/// Carries the identity-provider's validated outputs (username and group
/// claims) plus the handles needed to answer RBAC queries.
#[derive(Clone)]
pub struct SsoSessionAuth {
    username: Option<String>,
    groups: Vec<String>,
    config: Arc<AuthConfig>,
    resolver: NamespacePermissionResolver,
}

impl SsoSessionAuth {
    /// Match a SAML session against the request
    pub fn match_saml(
        config: &Arc<AuthConfig>,
        providers: &SsoProviders,
        resolver: &NamespacePermissionResolver,
        session: Option<&Session>,
    ) -> Option<Self> {
        if !providers.saml.is_enabled() {
            return None;
        }
        Self::from_session(config, resolver, session, AuthenticationType::SessionSaml)
    }

    /// Match an OpenID Connect session against the request.
    ///
    /// On top of the shared session checks, the stored ID token is
    /// re-validated against the provider; any provider or network failure is
    /// logged and downgrades the session to a non-match.
    pub async fn match_openid_connect(
        config: &Arc<AuthConfig>,
        providers: &SsoProviders,
        resolver: &NamespacePermissionResolver,
        session: Option<&Session>,
    ) -> Option<Self> {
        if !providers.oidc.is_enabled() {
            return None;
        }

        let auth =
            Self::from_session(config, resolver, session, AuthenticationType::SessionOpenidConnect)?;

        let id_token = match session
            .and_then(|s| s.provider.as_ref())
            .and_then(|data| data.id_token.as_deref())
        {
            Some(token) => token,
            None => {
                debug!("OpenID Connect session has no ID token");
                return None;
            }
        };

        if let Err(error) = providers.oidc.validate_session_token(id_token).await {
            warn!(%error, "OpenID Connect session token failed re-validation");
            return None;
        }

        Some(auth)
    }

    /// Shared session checks: state machine plus the federated payload's
    /// claimed expiry instant
    fn from_session(
        config: &Arc<AuthConfig>,
        resolver: &NamespacePermissionResolver,
        session: Option<&Session>,
        expected: AuthenticationType,
    ) -> Option<Self> {
        match check_session(config.secret_key_configured(), session, expected) {
            SessionState::Valid => {}
            SessionState::Invalid => {
                debug!(session_type = ?expected, "SSO session failed validation");
                return None;
            }
            SessionState::NoSession | SessionState::WrongType => return None,
        }

        let data = match session.and_then(|s| s.provider.as_ref()) {
            Some(data) => data,
            None => {
                debug!(session_type = ?expected, "SSO session has no federated payload");
                return None;
            }
        };

        if let Some(expiry) = data.session_expiry {
            if expiry <= Utc::now() {
                debug!(session_type = ?expected, "federated session past its claimed expiry");
                return None;
            }
        }

        Some(Self {
            username: data.username.clone(),
            groups: data.groups.clone(),
            config: config.clone(),
            resolver: resolver.clone(),
        })
    }

    /// Group claims carried by the session
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

#[async_trait]
impl AuthCapability for SsoSessionAuth {
    fn username(&self) -> Option<String> {
        self.username.clone()
    }

    async fn is_admin(&self) -> Result<bool> {
        self.resolver.is_global_admin(&self.groups).await
    }

    fn requires_csrf_tokens(&self) -> bool {
        true
    }

    async fn can_publish_module_version(&self, namespace: &str) -> Result<bool> {
        if self
            .check_namespace_access(PermissionKind::Modify, namespace)
            .await?
        {
            return Ok(true);
        }
        // Default-allow holds only while no competing control exists: the
        // grant disappears as soon as publish keys or access controls are
        // configured.
        Ok(self.config.publish_api_keys.is_empty() && !self.config.enable_access_controls)
    }

    async fn can_upload_module_version(&self, namespace: &str) -> Result<bool> {
        if self
            .check_namespace_access(PermissionKind::Modify, namespace)
            .await?
        {
            return Ok(true);
        }
        Ok(self.config.upload_api_keys.is_empty() && !self.config.enable_access_controls)
    }

    async fn check_namespace_access(
        &self,
        permission: PermissionKind,
        namespace: &str,
    ) -> Result<bool> {
        self.resolver
            .check_namespace_access(&self.groups, permission, namespace)
            .await
    }

    async fn all_namespace_permissions(&self) -> Result<HashMap<String, PermissionKind>> {
        self.resolver.all_namespace_permissions(&self.groups).await
    }

    fn can_access_read_api(&self) -> bool {
        true
    }
}

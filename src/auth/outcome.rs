//! Resolved authentication outcome
//!
//! A closed set of tagged variants, one per mechanism, dispatched through
//! the capability contract. Immutable once computed and owned by a single
//! request's lifetime.

use crate::auth::capability::AuthCapability;
use crate::auth::rbac::PermissionKind;
use crate::auth::strategies::{
    AdminApiKeyAuth, AdminSessionAuth, AnonymousAuth, PublishApiKeyAuth, SsoSessionAuth,
    TerraformAuthKeyAuth, TerraformOidcAuth, UploadApiKeyAuth,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// The strategy that matched a request, with its capability payload
pub enum AuthOutcome {
    /// Admin token presented in the API-key header
    AdminApiKey(AdminApiKeyAuth),
    /// Password session created with the admin token
    AdminSession(AdminSessionAuth),
    /// Configured module-upload key
    UploadApiKey(UploadApiKeyAuth),
    /// Configured module-publish key
    PublishApiKey(PublishApiKeyAuth),
    /// Federated SAML session
    Saml(SsoSessionAuth),
    /// Federated OpenID Connect session
    OpenidConnect(SsoSessionAuth),
    /// Static Terraform bearer token
    TerraformAuthKey(TerraformAuthKeyAuth),
    /// Short-lived CLI token from `terraform login`
    TerraformOidc(TerraformOidcAuth),
    /// Terminal fallback for unclaimed requests
    Anonymous(AnonymousAuth),
}

impl AuthOutcome {
    /// The matched strategy's capability payload
    fn capability(&self) -> &dyn AuthCapability {
        match self {
            AuthOutcome::AdminApiKey(auth) => auth,
            AuthOutcome::AdminSession(auth) => auth,
            AuthOutcome::UploadApiKey(auth) => auth,
            AuthOutcome::PublishApiKey(auth) => auth,
            AuthOutcome::Saml(auth) => auth,
            AuthOutcome::OpenidConnect(auth) => auth,
            AuthOutcome::TerraformAuthKey(auth) => auth,
            AuthOutcome::TerraformOidc(auth) => auth,
            AuthOutcome::Anonymous(auth) => auth,
        }
    }

    /// Stable name of the matched strategy, for logging and status output
    pub fn strategy_name(&self) -> &'static str {
        match self {
            AuthOutcome::AdminApiKey(_) => "admin_api_key",
            AuthOutcome::AdminSession(_) => "admin_session",
            AuthOutcome::UploadApiKey(_) => "upload_api_key",
            AuthOutcome::PublishApiKey(_) => "publish_api_key",
            AuthOutcome::Saml(_) => "saml",
            AuthOutcome::OpenidConnect(_) => "openid_connect",
            AuthOutcome::TerraformAuthKey(_) => "terraform_auth_key",
            AuthOutcome::TerraformOidc(_) => "terraform_oidc",
            AuthOutcome::Anonymous(_) => "anonymous",
        }
    }

    /// Whether the terminal fallback produced this outcome
    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthOutcome::Anonymous(_))
    }
}

impl std::fmt::Debug for AuthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthOutcome")
            .field(&self.strategy_name())
            .finish()
    }
}

#[async_trait]
impl AuthCapability for AuthOutcome {
    fn username(&self) -> Option<String> {
        self.capability().username()
    }

    fn is_built_in_admin(&self) -> bool {
        self.capability().is_built_in_admin()
    }

    async fn is_admin(&self) -> Result<bool> {
        self.capability().is_admin().await
    }

    fn is_authenticated(&self) -> bool {
        self.capability().is_authenticated()
    }

    fn requires_csrf_tokens(&self) -> bool {
        self.capability().requires_csrf_tokens()
    }

    async fn can_publish_module_version(&self, namespace: &str) -> Result<bool> {
        self.capability().can_publish_module_version(namespace).await
    }

    async fn can_upload_module_version(&self, namespace: &str) -> Result<bool> {
        self.capability().can_upload_module_version(namespace).await
    }

    async fn check_namespace_access(
        &self,
        permission: PermissionKind,
        namespace: &str,
    ) -> Result<bool> {
        self.capability()
            .check_namespace_access(permission, namespace)
            .await
    }

    async fn all_namespace_permissions(&self) -> Result<HashMap<String, PermissionKind>> {
        self.capability().all_namespace_permissions().await
    }

    fn can_access_read_api(&self) -> bool {
        self.capability().can_access_read_api()
    }

    fn can_access_terraform_api(&self) -> bool {
        self.capability().can_access_terraform_api()
    }

    fn should_record_analytics(&self) -> bool {
        self.capability().should_record_analytics()
    }

    fn terraform_auth_token(&self) -> Option<&str> {
        self.capability().terraform_auth_token()
    }
}

//! Authentication configuration

use super::sso::{OidcConfig, SamlConfig, TerraformIdpConfig};
use serde::{Deserialize, Serialize};

/// Authentication configuration.
///
/// Every strategy's `is_enabled` predicate is a pure function of this
/// structure; it is loaded once at startup and treated as immutable for the
/// process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static token granting built-in admin access
    #[serde(default)]
    pub admin_authentication_token: Option<String>,
    /// Server-side secret required for any session-based authentication
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Static keys granting module-upload access
    #[serde(default)]
    pub upload_api_keys: Vec<String>,
    /// Static keys granting module-publish access
    #[serde(default)]
    pub publish_api_keys: Vec<String>,
    /// Terraform bearer tokens recorded in analytics, optionally qualified
    /// as `token:environment`
    #[serde(default)]
    pub analytics_auth_keys: Vec<String>,
    /// Terraform bearer tokens excluded from analytics recording
    #[serde(default)]
    pub ignore_analytics_auth_keys: Vec<String>,
    /// Terraform bearer tokens used by the registry's own module extraction
    #[serde(default)]
    pub internal_extraction_analytics_tokens: Vec<String>,
    /// Whether namespace access controls (RBAC) are enforced
    #[serde(default)]
    pub enable_access_controls: bool,
    /// Whether unauthenticated callers may use the read API
    #[serde(default = "default_true")]
    pub allow_unauthenticated_access: bool,
    /// Lifetime of admin password sessions, in minutes
    #[serde(default = "default_session_expiry_mins")]
    pub admin_session_expiry_mins: i64,
    /// OpenID Connect provider settings
    #[serde(default)]
    pub openid_connect: OidcConfig,
    /// SAML provider settings
    #[serde(default)]
    pub saml: SamlConfig,
    /// Settings for the registry's own Terraform CLI identity provider
    #[serde(default)]
    pub terraform_oidc_provider: TerraformIdpConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_authentication_token: None,
            secret_key: None,
            upload_api_keys: Vec::new(),
            publish_api_keys: Vec::new(),
            analytics_auth_keys: Vec::new(),
            ignore_analytics_auth_keys: Vec::new(),
            internal_extraction_analytics_tokens: Vec::new(),
            enable_access_controls: false,
            allow_unauthenticated_access: default_true(),
            admin_session_expiry_mins: default_session_expiry_mins(),
            openid_connect: OidcConfig::default(),
            saml: SamlConfig::default(),
            terraform_oidc_provider: TerraformIdpConfig::default(),
        }
    }
}

impl AuthConfig {
    /// The configured admin token, treating a blank value as unset
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_authentication_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    /// Whether a server-side session secret is configured
    pub fn secret_key_configured(&self) -> bool {
        self.secret_key
            .as_deref()
            .map(|key| !key.is_empty())
            .unwrap_or(false)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.admin_token().is_some() && !self.secret_key_configured() {
            return Err(
                "admin_authentication_token requires secret_key for admin sessions".to_string(),
            );
        }

        if (self.openid_connect.is_configured() || self.saml.is_configured())
            && !self.secret_key_configured()
        {
            return Err("SSO providers require secret_key to be configured".to_string());
        }

        if self.admin_session_expiry_mins <= 0 {
            return Err("admin_session_expiry_mins must be positive".to_string());
        }

        self.openid_connect.validate()?;
        self.terraform_oidc_provider.validate()?;

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_session_expiry_mins() -> i64 {
    60
}

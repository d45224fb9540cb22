//! Terraform protocol authentication strategies
//!
//! Three static bearer-token families plus the short-lived CLI token issued
//! by the registry's own identity provider. All of them grant Terraform
//! protocol access only; none reach the read API.

use crate::auth::RequestCredentials;
use crate::auth::capability::AuthCapability;
use crate::config::AuthConfig;
use crate::provider::TerraformIdp;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed pattern extracting the token from an Authorization header
static BEARER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Bearer (.+)$").expect("bearer pattern is valid"));

/// Extract the bearer token from an Authorization header value.
///
/// A missing or malformed header never matches any Terraform strategy.
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    BEARER_PATTERN
        .captures(authorization)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
}

/// Which static token list a Terraform key outcome matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerraformTokenKind {
    /// Tokens recorded in analytics, optionally qualified with an
    /// environment label
    Analytics,
    /// Tokens whose requests are excluded from analytics
    IgnoreAnalytics,
    /// Tokens used by the registry's own module extraction
    InternalExtraction,
}

/// Authenticated by a configured static Terraform bearer token
#[derive(Debug, Clone)]
pub struct TerraformAuthKeyAuth {
    kind: TerraformTokenKind,
    environment: Option<String>,
}

impl TerraformAuthKeyAuth {
    /// Whether the token list for `kind` is configured
    pub fn is_enabled(config: &AuthConfig, kind: TerraformTokenKind) -> bool {
        !Self::key_list(config, kind).is_empty()
    }

    /// Match when the Authorization bearer token appears in the configured
    /// list for `kind`, comparing only the portion before any `:` qualifier
    pub fn matches_request(
        config: &AuthConfig,
        kind: TerraformTokenKind,
        credentials: &RequestCredentials,
    ) -> Option<Self> {
        let authorization = credentials.authorization.as_deref()?;
        let token = extract_bearer_token(authorization)?;

        Self::key_list(config, kind)
            .iter()
            .find(|entry| entry_token(entry) == token)
            .map(|entry| Self {
                kind,
                environment: entry_environment(entry),
            })
    }

    fn key_list(config: &AuthConfig, kind: TerraformTokenKind) -> &[String] {
        match kind {
            TerraformTokenKind::Analytics => &config.analytics_auth_keys,
            TerraformTokenKind::IgnoreAnalytics => &config.ignore_analytics_auth_keys,
            TerraformTokenKind::InternalExtraction => &config.internal_extraction_analytics_tokens,
        }
    }

    /// Which token list this outcome matched
    pub fn kind(&self) -> TerraformTokenKind {
        self.kind
    }

    /// Environment label of the matched key, for analytics attribution
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }
}

/// The comparable portion of a configured entry: everything before the
/// optional `:` qualifier
fn entry_token(entry: &str) -> &str {
    entry.split(':').next().unwrap_or(entry)
}

/// The qualifier of a configured entry, when present and non-empty
fn entry_environment(entry: &str) -> Option<String> {
    entry
        .split_once(':')
        .map(|(_, environment)| environment)
        .filter(|environment| !environment.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl AuthCapability for TerraformAuthKeyAuth {
    fn can_access_terraform_api(&self) -> bool {
        true
    }

    fn should_record_analytics(&self) -> bool {
        self.kind == TerraformTokenKind::Analytics
    }
}

/// Authenticated by a short-lived CLI token from `terraform login`
#[derive(Debug, Clone)]
pub struct TerraformOidcAuth {
    token: String,
    subject: String,
}

impl TerraformOidcAuth {
    /// Whether the registry's identity provider is configured
    pub fn is_enabled(idp: &TerraformIdp) -> bool {
        idp.is_enabled()
    }

    /// Match when the Authorization bearer token validates against the
    /// identity provider; validation failures are logged and fall through
    pub fn matches_request(idp: &TerraformIdp, credentials: &RequestCredentials) -> Option<Self> {
        let authorization = credentials.authorization.as_deref()?;
        let token = extract_bearer_token(authorization)?;

        match idp.validate_bearer(token) {
            Ok(claims) => Some(Self {
                token: token.to_string(),
                subject: claims.sub,
            }),
            Err(error) => {
                tracing::debug!(%error, "bearer token failed identity-provider validation");
                None
            }
        }
    }
}

#[async_trait]
impl AuthCapability for TerraformOidcAuth {
    fn username(&self) -> Option<String> {
        Some(self.subject.clone())
    }

    fn can_access_terraform_api(&self) -> bool {
        true
    }

    // CLI tokens are scoped to the Terraform protocol; they never grant the
    // read API even though the caller is authenticated.
    fn can_access_read_api(&self) -> bool {
        false
    }

    fn terraform_auth_token(&self) -> Option<&str> {
        Some(&self.token)
    }
}

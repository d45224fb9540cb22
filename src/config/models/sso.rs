//! Identity-provider configuration

use serde::{Deserialize, Serialize};

/// OpenID Connect provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Issuer URL, used for discovery and issuer validation
    #[serde(default)]
    pub issuer_url: Option<String>,
    /// Client ID registered with the provider
    #[serde(default)]
    pub client_id: Option<String>,
    /// Client secret registered with the provider
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Seconds a cached copy of the provider's discovery metadata and key
    /// set stays fresh
    #[serde(default = "default_metadata_cache_secs")]
    pub metadata_cache_secs: u64,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            issuer_url: None,
            client_id: None,
            client_secret: None,
            metadata_cache_secs: default_metadata_cache_secs(),
        }
    }
}

impl OidcConfig {
    /// Whether the provider is fully configured
    pub fn is_configured(&self) -> bool {
        configured(&self.issuer_url) && configured(&self.client_id)
    }

    /// Validate the provider settings
    pub fn validate(&self) -> Result<(), String> {
        if let Some(issuer) = self.issuer_url.as_deref().filter(|url| !url.is_empty()) {
            url::Url::parse(issuer)
                .map_err(|e| format!("Invalid OpenID Connect issuer URL: {}", e))?;
        }
        Ok(())
    }
}

/// SAML provider settings.
///
/// Assertion exchange happens outside this engine; these fields only gate
/// whether the SAML session strategy participates in the chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamlConfig {
    /// URL of the identity provider's metadata document
    #[serde(default)]
    pub idp_metadata_url: Option<String>,
    /// Entity ID this registry presents to the identity provider
    #[serde(default)]
    pub entity_id: Option<String>,
}

impl SamlConfig {
    /// Whether the provider is fully configured
    pub fn is_configured(&self) -> bool {
        configured(&self.idp_metadata_url) && configured(&self.entity_id)
    }
}

/// Settings for the registry's own identity provider backing
/// `terraform login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerraformIdpConfig {
    /// Path to the RS256 public key PEM used to verify issued tokens
    #[serde(default)]
    pub signing_key_path: Option<String>,
    /// Public URL of this registry, used as the token issuer
    #[serde(default)]
    pub public_url: Option<String>,
}

impl TerraformIdpConfig {
    /// Whether the identity provider is fully configured
    pub fn is_configured(&self) -> bool {
        configured(&self.signing_key_path) && configured(&self.public_url)
    }

    /// Validate the identity provider settings
    pub fn validate(&self) -> Result<(), String> {
        if configured(&self.signing_key_path) != configured(&self.public_url) {
            return Err(
                "terraform_oidc_provider requires both signing_key_path and public_url"
                    .to_string(),
            );
        }
        if let Some(public_url) = self.public_url.as_deref().filter(|url| !url.is_empty()) {
            url::Url::parse(public_url).map_err(|e| format!("Invalid public URL: {}", e))?;
        }
        Ok(())
    }
}

fn configured(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.is_empty()).unwrap_or(false)
}

fn default_metadata_cache_secs() -> u64 {
    // One hour; discovery metadata rarely changes and a blocking refresh on
    // expiry is acceptable at this frequency.
    3600
}

//! Identity-provider collaborators
//!
//! The engine never performs protocol handshakes itself; these types wrap
//! the validated outputs the external providers hand back.

pub mod oidc;
pub mod terraform_idp;

pub use oidc::{OidcProvider, ProviderMetadata};
pub use terraform_idp::{TerraformIdp, TerraformIdpClaims};

use crate::config::SamlConfig;
use std::sync::Arc;

/// SAML provider gate.
///
/// Assertion parsing and the login exchange are external; the session
/// payload already carries their validated outputs, so the engine only needs
/// to know whether the provider participates at all.
pub struct SamlProvider {
    configured: bool,
}

impl SamlProvider {
    /// Create a provider gate from configuration
    pub fn new(config: &SamlConfig) -> Self {
        Self {
            configured: config.is_configured(),
        }
    }

    /// Whether the provider is configured
    pub fn is_enabled(&self) -> bool {
        self.configured
    }
}

/// Bundle of the SSO providers, constructed once at startup and passed by
/// reference to the resolver
#[derive(Clone)]
pub struct SsoProviders {
    /// OpenID Connect provider client
    pub oidc: Arc<OidcProvider>,
    /// SAML provider gate
    pub saml: Arc<SamlProvider>,
}

impl SsoProviders {
    /// Create the provider bundle
    pub fn new(oidc: Arc<OidcProvider>, saml: Arc<SamlProvider>) -> Self {
        Self { oidc, saml }
    }
}

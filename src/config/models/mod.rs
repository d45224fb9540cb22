//! Configuration models

pub mod auth;
pub mod server;
pub mod sso;

pub use auth::AuthConfig;
pub use server::ServerConfig;
pub use sso::{OidcConfig, SamlConfig, TerraformIdpConfig};

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

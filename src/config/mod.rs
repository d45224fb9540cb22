//! Configuration management

mod loader;
pub mod models;

pub use models::{AppConfig, AuthConfig, OidcConfig, SamlConfig, ServerConfig, TerraformIdpConfig};

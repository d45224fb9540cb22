//! Configuration loading utilities
//!
//! Configuration is read from an optional YAML file, then overlaid with
//! environment variables, then validated. The result is loaded once at
//! process start and immutable afterwards.

use super::models::AppConfig;
use crate::utils::error::{RegistryError, Result};
use std::env;
use std::path::Path;
use tracing::{debug, info};

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "Loading configuration file");
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the optional file at `path`, overlay
    /// environment variables, and validate the result
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = "config/registry.yaml";
                if Path::new(default_path).exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No configuration file found, using defaults");
                    AppConfig::default()
                }
            }
        };

        config.apply_env_overrides()?;
        config.validate().map_err(RegistryError::Config)?;

        info!("Configuration loaded");
        Ok(config)
    }

    /// Overlay configuration with environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("REGISTRY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("REGISTRY_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| RegistryError::Config(format!("Invalid port: {}", e)))?;
        }

        if let Ok(token) = env::var("ADMIN_AUTHENTICATION_TOKEN") {
            self.auth.admin_authentication_token = Some(token);
        }
        if let Ok(secret) = env::var("SECRET_KEY") {
            self.auth.secret_key = Some(secret);
        }
        if let Ok(keys) = env::var("UPLOAD_API_KEYS") {
            self.auth.upload_api_keys = split_keys(&keys);
        }
        if let Ok(keys) = env::var("PUBLISH_API_KEYS") {
            self.auth.publish_api_keys = split_keys(&keys);
        }
        if let Ok(keys) = env::var("ANALYTICS_AUTH_KEYS") {
            self.auth.analytics_auth_keys = split_keys(&keys);
        }
        if let Ok(keys) = env::var("IGNORE_ANALYTICS_AUTH_KEYS") {
            self.auth.ignore_analytics_auth_keys = split_keys(&keys);
        }
        if let Ok(keys) = env::var("INTERNAL_EXTRACTION_ANALYTICS_TOKENS") {
            self.auth.internal_extraction_analytics_tokens = split_keys(&keys);
        }
        if let Ok(value) = env::var("ENABLE_ACCESS_CONTROLS") {
            self.auth.enable_access_controls = parse_bool("ENABLE_ACCESS_CONTROLS", &value)?;
        }
        if let Ok(value) = env::var("ALLOW_UNAUTHENTICATED_ACCESS") {
            self.auth.allow_unauthenticated_access =
                parse_bool("ALLOW_UNAUTHENTICATED_ACCESS", &value)?;
        }
        if let Ok(value) = env::var("ADMIN_SESSION_EXPIRY_MINS") {
            self.auth.admin_session_expiry_mins = value
                .parse()
                .map_err(|e| RegistryError::Config(format!("Invalid session expiry: {}", e)))?;
        }

        if let Ok(url) = env::var("OPENID_CONNECT_ISSUER_URL") {
            self.auth.openid_connect.issuer_url = Some(url);
        }
        if let Ok(client_id) = env::var("OPENID_CONNECT_CLIENT_ID") {
            self.auth.openid_connect.client_id = Some(client_id);
        }
        if let Ok(client_secret) = env::var("OPENID_CONNECT_CLIENT_SECRET") {
            self.auth.openid_connect.client_secret = Some(client_secret);
        }

        if let Ok(url) = env::var("SAML_IDP_METADATA_URL") {
            self.auth.saml.idp_metadata_url = Some(url);
        }
        if let Ok(entity_id) = env::var("SAML_ENTITY_ID") {
            self.auth.saml.entity_id = Some(entity_id);
        }

        if let Ok(path) = env::var("TERRAFORM_OIDC_SIGNING_KEY_PATH") {
            self.auth.terraform_oidc_provider.signing_key_path = Some(path);
        }
        if let Ok(url) = env::var("PUBLIC_URL") {
            self.auth.terraform_oidc_provider.public_url = Some(url);
        }

        Ok(())
    }
}

/// Split a comma-separated key list, dropping blank entries
fn split_keys(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean environment value
fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(RegistryError::Config(format!(
            "Invalid boolean for {}: {}",
            name, value
        ))),
    }
}

//! Narrow-purpose static API key strategies
//!
//! Upload and publish keys grant exactly one operation each, in any
//! namespace, and nothing else — no read API, no Terraform API.

use crate::auth::RequestCredentials;
use crate::auth::capability::AuthCapability;
use crate::config::AuthConfig;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Whether the presented API key appears verbatim in the configured list
fn key_in_list(keys: &[String], credentials: &RequestCredentials) -> bool {
    match credentials.api_key.as_deref() {
        Some(provided) if !provided.is_empty() => keys.iter().any(|key| key == provided),
        _ => false,
    }
}

/// Authenticated by one of the configured module-upload keys
#[derive(Debug, Clone, Copy)]
pub struct UploadApiKeyAuth;

impl UploadApiKeyAuth {
    /// Whether any upload keys are configured
    pub fn is_enabled(config: &AuthConfig) -> bool {
        !config.upload_api_keys.is_empty()
    }

    /// Match when the API-key header equals one of the configured keys
    pub fn matches_request(config: &AuthConfig, credentials: &RequestCredentials) -> bool {
        key_in_list(&config.upload_api_keys, credentials)
    }
}

#[async_trait]
impl AuthCapability for UploadApiKeyAuth {
    async fn can_upload_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Authenticated by one of the configured module-publish keys
#[derive(Debug, Clone, Copy)]
pub struct PublishApiKeyAuth;

impl PublishApiKeyAuth {
    /// Whether any publish keys are configured
    pub fn is_enabled(config: &AuthConfig) -> bool {
        !config.publish_api_keys.is_empty()
    }

    /// Match when the API-key header equals one of the configured keys
    pub fn matches_request(config: &AuthConfig, credentials: &RequestCredentials) -> bool {
        key_in_list(&config.publish_api_keys, credentials)
    }
}

#[async_trait]
impl AuthCapability for PublishApiKeyAuth {
    async fn can_publish_module_version(&self, _namespace: &str) -> Result<bool> {
        Ok(true)
    }
}

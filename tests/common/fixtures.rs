//! Test fixtures and factories

use std::sync::Arc;
use terrareg_rs::auth::{AuthResolver, RequestCredentials};
use terrareg_rs::config::{AppConfig, AuthConfig, SamlConfig};
use terrareg_rs::provider::{OidcProvider, SamlProvider, SsoProviders, TerraformIdp};
use terrareg_rs::server::AppState;
use terrareg_rs::storage::StorageLayer;
use terrareg_rs::storage::memory::MemoryBackend;

/// Build a resolver over a fresh in-memory backend
pub fn resolver_with(config: AuthConfig) -> (Arc<AuthResolver>, Arc<MemoryBackend>) {
    let (storage, backend) = StorageLayer::in_memory();
    let providers = SsoProviders::new(
        Arc::new(OidcProvider::new(config.openid_connect.clone())),
        Arc::new(SamlProvider::new(&config.saml)),
    );
    let resolver = Arc::new(AuthResolver::new(
        Arc::new(config),
        Arc::new(storage),
        providers,
        Arc::new(TerraformIdp::disabled()),
    ));
    (resolver, backend)
}

/// Application state wired to a fresh in-memory backend
pub fn app_state(config: AuthConfig) -> (AppState, Arc<MemoryBackend>) {
    let (storage, backend) = StorageLayer::in_memory();
    let storage = Arc::new(storage);
    let providers = SsoProviders::new(
        Arc::new(OidcProvider::new(config.openid_connect.clone())),
        Arc::new(SamlProvider::new(&config.saml)),
    );
    let auth = Arc::new(AuthResolver::new(
        Arc::new(config.clone()),
        storage.clone(),
        providers,
        Arc::new(TerraformIdp::disabled()),
    ));

    let app_config = AppConfig {
        auth: config,
        ..AppConfig::default()
    };

    (
        AppState {
            config: Arc::new(app_config),
            auth,
            storage,
        },
        backend,
    )
}

/// Configuration with the built-in admin token set
pub fn admin_config() -> AuthConfig {
    AuthConfig {
        admin_authentication_token: Some("abc123".to_string()),
        secret_key: Some("secret".to_string()),
        ..AuthConfig::default()
    }
}

/// Configuration with SAML and access controls enabled
pub fn saml_config() -> AuthConfig {
    AuthConfig {
        secret_key: Some("secret".to_string()),
        enable_access_controls: true,
        saml: SamlConfig {
            idp_metadata_url: Some("https://idp.example.com/metadata".to_string()),
            entity_id: Some("registry".to_string()),
        },
        ..AuthConfig::default()
    }
}

/// Credentials presenting an API key
pub fn api_key(key: &str) -> RequestCredentials {
    RequestCredentials {
        api_key: Some(key.to_string()),
        ..RequestCredentials::default()
    }
}

/// Credentials presenting a session cookie
pub fn session_cookie(id: &str) -> RequestCredentials {
    RequestCredentials {
        session_id: Some(id.to_string()),
        ..RequestCredentials::default()
    }
}

//! HTTP server for the registry

pub mod middleware;
pub mod routes;

use crate::auth::AuthResolver;
use crate::config::AppConfig;
use crate::provider::{OidcProvider, SamlProvider, SsoProviders, TerraformIdp};
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Authentication resolver
    pub auth: Arc<AuthResolver>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
}

/// Build the authentication resolver and its collaborators from
/// configuration
pub fn build_auth_resolver(
    config: &AppConfig,
    storage: Arc<StorageLayer>,
) -> Result<Arc<AuthResolver>> {
    let providers = SsoProviders::new(
        Arc::new(OidcProvider::new(config.auth.openid_connect.clone())),
        Arc::new(SamlProvider::new(&config.auth.saml)),
    );
    let terraform_idp = Arc::new(TerraformIdp::from_config(&config.auth.terraform_oidc_provider)?);

    Ok(Arc::new(AuthResolver::new(
        Arc::new(config.auth.clone()),
        storage,
        providers,
        terraform_idp,
    )))
}

/// Run the registry server until shutdown
pub async fn run_server(config: AppConfig) -> Result<()> {
    let (storage, _backend) = StorageLayer::in_memory();
    let storage = Arc::new(storage);
    let auth = build_auth_resolver(&config, storage.clone())?;

    let state = AppState {
        config: Arc::new(config),
        auth,
        storage,
    };

    // Hourly sweep of expired session records.
    let janitor = state.storage.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match janitor.sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Removed expired sessions"),
                Err(error) => warn!(%error, "Session cleanup failed"),
            }
        }
    });

    let bind_address = (state.config.server.host.clone(), state.config.server.port);
    info!(host = %bind_address.0, port = bind_address.1, "Starting registry server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::AuthMiddleware)
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}

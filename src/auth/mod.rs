//! Authentication and authorization resolution engine
//!
//! Every inbound request is resolved to exactly one [`AuthOutcome`] by
//! walking a fixed-precedence chain of strategies: admin mechanisms first,
//! federated SSO next, narrow-purpose static tokens after, and the anonymous
//! terminal last. The first strategy that is both enabled by configuration
//! and matched by the request wins, and the result is memoized for the rest
//! of the request.

pub mod capability;
pub mod outcome;
pub mod rbac;
pub mod session;
pub mod strategies;

pub use capability::AuthCapability;
pub use outcome::AuthOutcome;

use crate::auth::rbac::NamespacePermissionResolver;
use crate::auth::session::Session;
use crate::auth::strategies::{
    AdminApiKeyAuth, AdminSessionAuth, AnonymousAuth, PublishApiKeyAuth, SsoSessionAuth,
    TerraformAuthKeyAuth, TerraformOidcAuth, TerraformTokenKind, UploadApiKeyAuth,
};
use crate::config::AuthConfig;
use crate::provider::{SsoProviders, TerraformIdp};
use crate::storage::StorageLayer;
use crate::utils::error::{RegistryError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Credentials extracted from one request's boundary
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials {
    /// Value of the `X-Terrareg-ApiKey` header
    pub api_key: Option<String>,
    /// Value of the `Authorization` header
    pub authorization: Option<String>,
    /// Session identifier from the session cookie
    pub session_id: Option<String>,
}

/// Strategy identifiers in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrategyKind {
    AdminApiKey,
    AdminSession,
    UploadApiKey,
    PublishApiKey,
    Saml,
    OpenidConnect,
    TerraformAnalyticsKey,
    TerraformIgnoreAnalyticsKey,
    TerraformInternalExtractionKey,
    TerraformOidc,
    Anonymous,
}

/// Fixed precedence order of the resolution chain. The anonymous terminal
/// is always last and always matches, guaranteeing termination.
const STRATEGY_ORDER: &[StrategyKind] = &[
    StrategyKind::AdminApiKey,
    StrategyKind::AdminSession,
    StrategyKind::UploadApiKey,
    StrategyKind::PublishApiKey,
    StrategyKind::Saml,
    StrategyKind::OpenidConnect,
    StrategyKind::TerraformAnalyticsKey,
    StrategyKind::TerraformIgnoreAnalyticsKey,
    StrategyKind::TerraformInternalExtractionKey,
    StrategyKind::TerraformOidc,
    StrategyKind::Anonymous,
];

/// Resolves request credentials to an authentication outcome.
///
/// Constructed once at startup and shared by reference; holds only
/// read-only configuration and the service handles strategies need.
pub struct AuthResolver {
    config: Arc<AuthConfig>,
    storage: Arc<StorageLayer>,
    providers: SsoProviders,
    terraform_idp: Arc<TerraformIdp>,
    rbac: NamespacePermissionResolver,
}

impl AuthResolver {
    /// Create a resolver over the given collaborators
    pub fn new(
        config: Arc<AuthConfig>,
        storage: Arc<StorageLayer>,
        providers: SsoProviders,
        terraform_idp: Arc<TerraformIdp>,
    ) -> Self {
        let rbac = NamespacePermissionResolver::new(
            storage.user_groups.clone(),
            config.enable_access_controls,
        );
        Self {
            config,
            storage,
            providers,
            terraform_idp,
            rbac,
        }
    }

    /// The namespace permission resolver backing SSO outcomes
    pub fn permission_resolver(&self) -> &NamespacePermissionResolver {
        &self.rbac
    }

    /// The authentication configuration this resolver was built with
    pub fn config(&self) -> &Arc<AuthConfig> {
        &self.config
    }

    /// Resolve the request to the first enabled, matching strategy.
    ///
    /// Per-strategy validation failures have already been downgraded to
    /// non-matches by the time this returns; the only error path is the
    /// invariant violation of an exhausted chain, which means the terminal
    /// fallback was removed and must abort the request.
    pub async fn resolve(&self, credentials: &RequestCredentials) -> Result<AuthOutcome> {
        let session = self.lookup_session(credentials).await;

        for kind in STRATEGY_ORDER {
            if !self.strategy_enabled(*kind) {
                continue;
            }
            if let Some(outcome) = self.try_match(*kind, credentials, session.as_ref()).await {
                debug!(strategy = outcome.strategy_name(), "authentication strategy matched");
                return Ok(outcome);
            }
        }

        Err(RegistryError::internal(
            "authentication chain exhausted without the anonymous terminal matching",
        ))
    }

    /// One session-store read per request; a storage failure is logged and
    /// treated as "no session" so the chain can fall through
    async fn lookup_session(&self, credentials: &RequestCredentials) -> Option<Session> {
        let session_id = credentials.session_id.as_deref()?;
        if session_id.is_empty() {
            return None;
        }

        match self.storage.sessions.get_session(session_id).await {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "session lookup failed, treating request as sessionless");
                None
            }
        }
    }

    /// Whether a strategy participates, as a pure function of configuration
    fn strategy_enabled(&self, kind: StrategyKind) -> bool {
        match kind {
            StrategyKind::AdminApiKey => AdminApiKeyAuth::is_enabled(&self.config),
            StrategyKind::AdminSession => AdminSessionAuth::is_enabled(&self.config),
            StrategyKind::UploadApiKey => UploadApiKeyAuth::is_enabled(&self.config),
            StrategyKind::PublishApiKey => PublishApiKeyAuth::is_enabled(&self.config),
            StrategyKind::Saml => self.providers.saml.is_enabled(),
            StrategyKind::OpenidConnect => self.providers.oidc.is_enabled(),
            StrategyKind::TerraformAnalyticsKey => {
                TerraformAuthKeyAuth::is_enabled(&self.config, TerraformTokenKind::Analytics)
            }
            StrategyKind::TerraformIgnoreAnalyticsKey => {
                TerraformAuthKeyAuth::is_enabled(&self.config, TerraformTokenKind::IgnoreAnalytics)
            }
            StrategyKind::TerraformInternalExtractionKey => TerraformAuthKeyAuth::is_enabled(
                &self.config,
                TerraformTokenKind::InternalExtraction,
            ),
            StrategyKind::TerraformOidc => TerraformOidcAuth::is_enabled(&self.terraform_idp),
            StrategyKind::Anonymous => AnonymousAuth::is_enabled(&self.config),
        }
    }

    /// Ask one enabled strategy whether the request satisfies it
    async fn try_match(
        &self,
        kind: StrategyKind,
        credentials: &RequestCredentials,
        session: Option<&Session>,
    ) -> Option<AuthOutcome> {
        match kind {
            StrategyKind::AdminApiKey => {
                AdminApiKeyAuth::matches_request(&self.config, credentials)
                    .then_some(AuthOutcome::AdminApiKey(AdminApiKeyAuth))
            }
            StrategyKind::AdminSession => AdminSessionAuth::matches_request(&self.config, session)
                .then_some(AuthOutcome::AdminSession(AdminSessionAuth)),
            StrategyKind::UploadApiKey => {
                UploadApiKeyAuth::matches_request(&self.config, credentials)
                    .then_some(AuthOutcome::UploadApiKey(UploadApiKeyAuth))
            }
            StrategyKind::PublishApiKey => {
                PublishApiKeyAuth::matches_request(&self.config, credentials)
                    .then_some(AuthOutcome::PublishApiKey(PublishApiKeyAuth))
            }
            StrategyKind::Saml => {
                SsoSessionAuth::match_saml(&self.config, &self.providers, &self.rbac, session)
                    .map(AuthOutcome::Saml)
            }
            StrategyKind::OpenidConnect => SsoSessionAuth::match_openid_connect(
                &self.config,
                &self.providers,
                &self.rbac,
                session,
            )
            .await
            .map(AuthOutcome::OpenidConnect),
            StrategyKind::TerraformAnalyticsKey => TerraformAuthKeyAuth::matches_request(
                &self.config,
                TerraformTokenKind::Analytics,
                credentials,
            )
            .map(AuthOutcome::TerraformAuthKey),
            StrategyKind::TerraformIgnoreAnalyticsKey => TerraformAuthKeyAuth::matches_request(
                &self.config,
                TerraformTokenKind::IgnoreAnalytics,
                credentials,
            )
            .map(AuthOutcome::TerraformAuthKey),
            StrategyKind::TerraformInternalExtractionKey => {
                TerraformAuthKeyAuth::matches_request(
                    &self.config,
                    TerraformTokenKind::InternalExtraction,
                    credentials,
                )
                .map(AuthOutcome::TerraformAuthKey)
            }
            StrategyKind::TerraformOidc => {
                TerraformOidcAuth::matches_request(&self.terraform_idp, credentials)
                    .map(AuthOutcome::TerraformOidc)
            }
            StrategyKind::Anonymous => AnonymousAuth::matches_request()
                .then(|| AuthOutcome::Anonymous(AnonymousAuth::new(self.config.clone()))),
        }
    }
}

/// Per-request authentication context.
///
/// Carries the extracted credentials and memoizes the resolved outcome so
/// the chain runs at most once per request. One context is created per
/// request and dropped with it; contexts are never shared across requests.
pub struct AuthContext {
    resolver: Arc<AuthResolver>,
    credentials: RequestCredentials,
    outcome: OnceCell<Arc<AuthOutcome>>,
}

impl AuthContext {
    /// Create a context for one request's credentials
    pub fn new(resolver: Arc<AuthResolver>, credentials: RequestCredentials) -> Self {
        Self {
            resolver,
            credentials,
            outcome: OnceCell::new(),
        }
    }

    /// The credentials this context was created with
    pub fn credentials(&self) -> &RequestCredentials {
        &self.credentials
    }

    /// The resolved outcome, computed on first use and memoized after
    pub async fn outcome(&self) -> Result<Arc<AuthOutcome>> {
        self.outcome
            .get_or_try_init(|| async {
                self.resolver
                    .resolve(&self.credentials)
                    .await
                    .map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }
}

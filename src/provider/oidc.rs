//! OpenID Connect provider client
//!
//! Holds process-wide caches of the provider's discovery metadata and key
//! set, refreshed after a fixed staleness interval. Refreshes are blocking,
//! single-attempt fetches; a failure surfaces as a provider error that the
//! calling strategy downgrades to a non-match.

use crate::config::OidcConfig;
use crate::utils::error::{RegistryError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Discovery metadata published by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    /// Issuer identifier, matched against ID-token `iss` claims
    pub issuer: String,
    /// URL of the provider's JSON Web Key Set
    pub jwks_uri: String,
    /// Authorization endpoint, used by the login flow
    pub authorization_endpoint: Option<String>,
    /// Token endpoint, used by the login flow
    pub token_endpoint: Option<String>,
}

/// One key from the provider's key set
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Claims validated on a session's ID token
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[allow(dead_code)]
    sub: String,
}

struct Cached<T> {
    document: T,
    fetched_at: Instant,
}

/// Client for the configured OpenID Connect provider.
///
/// Constructed once at startup and shared by reference; the caches are the
/// only cross-request mutable state in the engine and their locks are never
/// held across awaits.
pub struct OidcProvider {
    config: OidcConfig,
    http: reqwest::Client,
    cache_ttl: Duration,
    metadata: RwLock<Option<Cached<ProviderMetadata>>>,
    jwks: RwLock<Option<Cached<JwkSet>>>,
}

impl OidcProvider {
    /// Create a provider client from configuration
    pub fn new(config: OidcConfig) -> Self {
        let cache_ttl = Duration::from_secs(config.metadata_cache_secs);
        Self {
            config,
            http: reqwest::Client::new(),
            cache_ttl,
            metadata: RwLock::new(None),
            jwks: RwLock::new(None),
        }
    }

    /// Whether the provider is configured
    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// The provider's discovery metadata, served from cache while fresh
    pub async fn metadata(&self) -> Result<ProviderMetadata> {
        if let Some(metadata) = self.fresh_metadata() {
            return Ok(metadata);
        }

        let issuer = self
            .config
            .issuer_url
            .as_deref()
            .ok_or_else(|| RegistryError::provider("OpenID Connect issuer not configured"))?;
        let url = format!(
            "{}/.well-known/openid-configuration",
            issuer.trim_end_matches('/'),
        );

        debug!(url, "Fetching OpenID Connect discovery metadata");
        let metadata: ProviderMetadata = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        *self.metadata.write() = Some(Cached {
            document: metadata.clone(),
            fetched_at: Instant::now(),
        });
        Ok(metadata)
    }

    fn fresh_metadata(&self) -> Option<ProviderMetadata> {
        let guard = self.metadata.read();
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.cache_ttl)
            .map(|cached| cached.document.clone())
    }

    async fn key_set(&self, jwks_uri: &str) -> Result<JwkSet> {
        {
            let guard = self.jwks.read();
            if let Some(cached) = guard
                .as_ref()
                .filter(|cached| cached.fetched_at.elapsed() < self.cache_ttl)
            {
                return Ok(cached.document.clone());
            }
        }

        debug!(url = jwks_uri, "Fetching OpenID Connect key set");
        let keys: JwkSet = self
            .http
            .get(jwks_uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        *self.jwks.write() = Some(Cached {
            document: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }

    /// Re-validate a session's ID token against the provider.
    ///
    /// Verifies the RS256 signature against the provider's published key
    /// set, plus issuer, audience and expiry. Any failure is returned as an
    /// error for the calling strategy to log and downgrade.
    pub async fn validate_session_token(&self, id_token: &str) -> Result<()> {
        if !self.is_enabled() {
            return Err(RegistryError::provider(
                "OpenID Connect provider not configured",
            ));
        }

        let metadata = self.metadata().await?;
        let keys = self.key_set(&metadata.jwks_uri).await?;

        let header = decode_header(id_token)?;
        let key = select_key(&keys, header.kid.as_deref())?;

        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| RegistryError::provider("OpenID Connect client_id not configured"))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&metadata.issuer]);
        validation.set_audience(&[client_id]);

        decode::<IdTokenClaims>(id_token, &key, &validation)?;
        Ok(())
    }
}

/// Pick the signing key matching the token header's `kid`, falling back to
/// the first RSA key when the header carries none
fn select_key(keys: &JwkSet, kid: Option<&str>) -> Result<DecodingKey> {
    let jwk = keys
        .keys
        .iter()
        .filter(|key| key.kty == "RSA")
        .find(|key| match kid {
            Some(kid) => key.kid.as_deref() == Some(kid),
            None => true,
        })
        .ok_or_else(|| RegistryError::provider("No matching key in provider key set"))?;

    let (n, e) = match (&jwk.n, &jwk.e) {
        (Some(n), Some(e)) => (n, e),
        _ => return Err(RegistryError::provider("Provider key missing RSA components")),
    };

    DecodingKey::from_rsa_components(n, e).map_err(RegistryError::Jwt)
}

//! Terraform CLI identity provider boundary
//!
//! The registry acts as its own identity provider for `terraform login`;
//! this engine only consumes the boundary check "is this bearer token valid
//! for some subject". Token issuance lives with the login flow.

use crate::config::TerraformIdpConfig;
use crate::utils::error::{RegistryError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

/// Claims carried by a CLI access token issued by this registry
#[derive(Debug, Clone, Deserialize)]
pub struct TerraformIdpClaims {
    /// Subject the token was issued to
    pub sub: String,
    /// Expiry, seconds since the epoch
    #[allow(dead_code)]
    pub exp: usize,
}

/// Validates bearer tokens issued by the registry's own identity provider.
///
/// Enabled only when both the verification key and the public URL are
/// configured; the public URL doubles as the expected token issuer.
pub struct TerraformIdp {
    key: Option<(DecodingKey, Algorithm)>,
    public_url: Option<String>,
}

impl TerraformIdp {
    /// Construct from configuration, loading the RS256 key PEM from disk
    pub fn from_config(config: &TerraformIdpConfig) -> Result<Self> {
        let key = match config.signing_key_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    RegistryError::Config(format!("Cannot read signing key {}: {}", path, e))
                })?;
                let key = DecodingKey::from_rsa_pem(&pem)
                    .map_err(|e| RegistryError::Config(format!("Invalid signing key: {}", e)))?;
                Some((key, Algorithm::RS256))
            }
            None => None,
        };

        Ok(Self {
            key,
            public_url: config.public_url.clone().filter(|url| !url.is_empty()),
        })
    }

    /// Construct from an explicit key, used by tests and embedders
    pub fn new(key: Option<(DecodingKey, Algorithm)>, public_url: Option<String>) -> Self {
        Self { key, public_url }
    }

    /// A provider that never participates in the chain
    pub fn disabled() -> Self {
        Self {
            key: None,
            public_url: None,
        }
    }

    /// Whether the identity provider is configured
    pub fn is_enabled(&self) -> bool {
        self.key.is_some() && self.public_url.is_some()
    }

    /// Validate an access token, returning its claims.
    ///
    /// Checks the signature, expiry and issuer; any failure is an error for
    /// the calling strategy to log and treat as a non-match.
    pub fn validate_bearer(&self, token: &str) -> Result<TerraformIdpClaims> {
        let (key, algorithm) = self
            .key
            .as_ref()
            .ok_or_else(|| RegistryError::provider("Terraform identity provider not configured"))?;
        let issuer = self
            .public_url
            .as_deref()
            .ok_or_else(|| RegistryError::provider("Terraform identity provider not configured"))?;

        let mut validation = Validation::new(*algorithm);
        validation.set_issuer(&[issuer]);
        validation.validate_aud = false;

        let token_data = decode::<TerraformIdpClaims>(token, key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
        iss: String,
    }

    fn test_idp() -> TerraformIdp {
        TerraformIdp::new(
            Some((DecodingKey::from_secret(b"test-key"), Algorithm::HS256)),
            Some("https://registry.example.com".to_string()),
        )
    }

    fn mint(secret: &[u8], issuer: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = TestClaims {
            sub: "cli-user".to_string(),
            exp,
            iss: issuer.to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_disabled_provider_rejects() {
        let idp = TerraformIdp::disabled();
        assert!(!idp.is_enabled());
        assert!(idp.validate_bearer("anything").is_err());
    }

    #[test]
    fn test_valid_token_accepted() {
        let idp = test_idp();
        let token = mint(b"test-key", "https://registry.example.com", 300);
        let claims = idp.validate_bearer(&token).unwrap();
        assert_eq!(claims.sub, "cli-user");
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let idp = test_idp();
        let token = mint(b"other-key", "https://registry.example.com", 300);
        assert!(idp.validate_bearer(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let idp = test_idp();
        let token = mint(b"test-key", "https://registry.example.com", -300);
        assert!(idp.validate_bearer(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let idp = test_idp();
        let token = mint(b"test-key", "https://elsewhere.example.com", 300);
        assert!(idp.validate_bearer(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let idp = test_idp();
        assert!(idp.validate_bearer("not-a-jwt").is_err());
    }
}

//! # terrareg-rs
//!
//! Authentication and authorization resolution engine for a Terraform
//! module registry.
//!
//! Every inbound request is resolved to exactly one authentication outcome
//! by a fixed-precedence strategy chain: built-in admin mechanisms, narrow
//! static API keys, federated SSO sessions (SAML and OpenID Connect),
//! Terraform bearer tokens, and an always-matching anonymous terminal.
//! Downstream endpoint guards query the winning outcome's capability
//! surface; SSO outcomes answer namespace questions through a group-based
//! RBAC resolver.
//!
//! ## Resolving a request
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use terrareg_rs::auth::{AuthCapability, AuthResolver, RequestCredentials};
//! use terrareg_rs::config::AppConfig;
//! use terrareg_rs::server::build_auth_resolver;
//! use terrareg_rs::storage::StorageLayer;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! let (storage, _backend) = StorageLayer::in_memory();
//! let resolver = build_auth_resolver(&config, Arc::new(storage))?;
//!
//! let credentials = RequestCredentials {
//!     api_key: Some("abc123".to_string()),
//!     ..RequestCredentials::default()
//! };
//! let outcome = resolver.resolve(&credentials).await?;
//! if outcome.can_publish_module_version("my-namespace").await? {
//!     // allowed
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod provider;
pub mod server;
pub mod storage;
pub mod utils;

pub use auth::{AuthCapability, AuthContext, AuthOutcome, AuthResolver, RequestCredentials};
pub use config::AppConfig;
pub use utils::error::{RegistryError, Result};

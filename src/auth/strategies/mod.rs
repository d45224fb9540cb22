//! Concrete authentication strategies
//!
//! One self-contained mechanism per module, each exposing a configuration
//! predicate and a request-match constructor.

pub mod admin;
pub mod anonymous;
pub mod api_keys;
pub mod sso;
pub mod terraform;

pub use admin::{AdminApiKeyAuth, AdminSessionAuth};
pub use anonymous::AnonymousAuth;
pub use api_keys::{PublishApiKeyAuth, UploadApiKeyAuth};
pub use sso::SsoSessionAuth;
pub use terraform::{
    TerraformAuthKeyAuth, TerraformOidcAuth, TerraformTokenKind, extract_bearer_token,
};

//! Integration tests

mod auth_chain_tests;
mod config_tests;
mod middleware_tests;
mod oidc_provider_tests;

//! Middleware for the registry server

pub mod auth;
pub mod helpers;

pub use auth::{AuthMiddleware, request_auth_context};

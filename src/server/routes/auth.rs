//! Authentication status endpoint

use crate::auth::AuthCapability;
use crate::auth::rbac::PermissionKind;
use crate::server::middleware::request_auth_context;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use std::collections::HashMap;

/// Capability surface of the resolved outcome, for UI and diagnostics
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    /// Which strategy matched the request
    pub auth_method: &'static str,
    /// Whether the caller's identity was established
    pub authenticated: bool,
    /// Display name of the principal, when known
    pub username: Option<String>,
    /// Whether the caller is a global administrator
    pub site_admin: bool,
    /// Whether the caller is the built-in administrator
    pub built_in_admin: bool,
    /// Whether state-changing requests need a CSRF token
    pub requires_csrf: bool,
    /// Whether the caller may use the read API
    pub read_api_access: bool,
    /// Whether the caller may use the Terraform protocol API
    pub terraform_api_access: bool,
    /// Namespaces the caller holds explicit permissions on
    pub namespace_permissions: HashMap<String, PermissionKind>,
}

/// `GET /v1/auth/status` — describe the resolved outcome for this request
pub async fn status(req: HttpRequest) -> ActixResult<HttpResponse> {
    let context = request_auth_context(&req)?;
    let outcome = context.outcome().await?;

    let response = AuthStatusResponse {
        auth_method: outcome.strategy_name(),
        authenticated: outcome.is_authenticated(),
        username: outcome.username(),
        site_admin: outcome.is_admin().await?,
        built_in_admin: outcome.is_built_in_admin(),
        requires_csrf: outcome.requires_csrf_tokens(),
        read_api_access: outcome.can_access_read_api(),
        terraform_api_access: outcome.can_access_terraform_api(),
        namespace_permissions: outcome.all_namespace_permissions().await?,
    };

    Ok(HttpResponse::Ok().json(response))
}

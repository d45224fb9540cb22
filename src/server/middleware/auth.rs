//! Authentication middleware
//!
//! Builds a fresh [`AuthContext`] from each request's credentials and stores
//! it in the request's extensions. Resolution itself is lazy: the chain runs
//! the first time a handler asks for the outcome, and the context memoizes
//! it for the rest of the request. Extensions are request-scoped, so nothing
//! leaks between requests on reused worker threads.

use crate::auth::AuthContext;
use crate::server::AppState;
use crate::server::middleware::helpers::extract_credentials;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Auth middleware for Actix-web
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

/// Service implementation for auth middleware
pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(state) = req.app_data::<web::Data<AppState>>() {
            let credentials = extract_credentials(req.headers());
            let context = AuthContext::new(state.auth.clone(), credentials);
            req.extensions_mut().insert(Arc::new(context));
        }

        Box::pin(self.service.call(req))
    }
}

/// Fetch the request's authentication context from its extensions
pub fn request_auth_context(req: &HttpRequest) -> Result<Arc<AuthContext>, actix_web::Error> {
    req.extensions()
        .get::<Arc<AuthContext>>()
        .cloned()
        .ok_or_else(|| {
            actix_web::error::ErrorInternalServerError("Missing authentication context")
        })
}

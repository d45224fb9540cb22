//! Route configuration for the registry server

pub mod auth;
pub mod health;

use actix_web::web;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .service(web::scope("/v1").route("/auth/status", web::get().to(auth::status)));
}

//! Health check endpoint

use actix_web::HttpResponse;
use serde_json::json;

/// `GET /health` — liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

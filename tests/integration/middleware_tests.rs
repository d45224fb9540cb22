//! Middleware and route integration tests

use crate::common::fixtures::{admin_config, app_state};
use actix_web::{App, test, web};
use terrareg_rs::config::AuthConfig;
use terrareg_rs::server::middleware::AuthMiddleware;
use terrareg_rs::server::routes;
use terrareg_rs::storage::SessionStore;
use terrareg_rs::auth::session::{AuthenticationType, Session};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(AuthMiddleware)
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_endpoint() {
    let (state, _backend) = app_state(AuthConfig::default());
    let app = init_app!(state);

    let request = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_status_reports_admin_outcome() {
    let (state, _backend) = app_state(admin_config());
    let app = init_app!(state);

    let request = test::TestRequest::get()
        .uri("/v1/auth/status")
        .insert_header(("X-Terrareg-ApiKey", "abc123"))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["auth_method"], "admin_api_key");
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["built_in_admin"], true);
    assert_eq!(body["site_admin"], true);
    assert_eq!(body["username"], "Built-in admin");
    assert_eq!(body["read_api_access"], true);
}

#[actix_web::test]
async fn test_status_reports_anonymous_outcome() {
    let (state, _backend) = app_state(admin_config());
    let app = init_app!(state);

    let request = test::TestRequest::get().uri("/v1/auth/status").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["auth_method"], "anonymous");
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["built_in_admin"], false);
    assert!(body["username"].is_null());
}

#[actix_web::test]
async fn test_status_reports_session_outcome() {
    let (state, backend) = app_state(admin_config());

    let session = Session::new(AuthenticationType::SessionPassword, 60);
    let session_id = session.id.clone();
    backend.create_session(session).await.unwrap();

    let app = init_app!(state);
    let request = test::TestRequest::get()
        .uri("/v1/auth/status")
        .insert_header(("Cookie", format!("session={}", session_id)))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["auth_method"], "admin_session");
    assert_eq!(body["requires_csrf"], true);
}

#[actix_web::test]
async fn test_requests_resolve_independently() {
    // Two requests through the same app must each get their own context:
    // the first one's admin outcome must not leak into the second.
    let (state, _backend) = app_state(admin_config());
    let app = init_app!(state);

    let admin_request = test::TestRequest::get()
        .uri("/v1/auth/status")
        .insert_header(("X-Terrareg-ApiKey", "abc123"))
        .to_request();
    let admin_body: serde_json::Value = test::call_and_read_body_json(&app, admin_request).await;
    assert_eq!(admin_body["auth_method"], "admin_api_key");

    let anonymous_request = test::TestRequest::get().uri("/v1/auth/status").to_request();
    let anonymous_body: serde_json::Value =
        test::call_and_read_body_json(&app, anonymous_request).await;
    assert_eq!(anonymous_body["auth_method"], "anonymous");
}

//! Resolution-chain integration tests
//!
//! Exercise the engine through its public API: chain precedence, the
//! fail-closed anonymous defaults, RBAC-backed SSO outcomes and per-request
//! memoization.

use crate::common::fixtures::{admin_config, api_key, resolver_with, saml_config, session_cookie};
use chrono::{Duration, Utc};
use std::sync::Arc;
use terrareg_rs::auth::rbac::{Namespace, PermissionKind, UserGroup};
use terrareg_rs::auth::session::{AuthenticationType, FederatedSessionData, Session};
use terrareg_rs::auth::{AuthCapability, AuthContext, RequestCredentials};
use terrareg_rs::config::AuthConfig;
use terrareg_rs::storage::SessionStore;

#[tokio::test]
async fn test_admin_token_resolves_to_built_in_admin() {
    let (resolver, _backend) = resolver_with(admin_config());

    let outcome = resolver.resolve(&api_key("abc123")).await.unwrap();
    assert_eq!(outcome.strategy_name(), "admin_api_key");
    assert!(outcome.is_built_in_admin());
    assert!(outcome.can_publish_module_version("any").await.unwrap());
    assert!(
        outcome
            .check_namespace_access(PermissionKind::Modify, "any")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_open_registry_anonymous_defaults() {
    let (resolver, _backend) = resolver_with(AuthConfig::default());

    let outcome = resolver
        .resolve(&RequestCredentials::default())
        .await
        .unwrap();
    assert!(outcome.is_anonymous());
    assert!(outcome.can_publish_module_version("ns").await.unwrap());
    assert!(outcome.can_upload_module_version("ns").await.unwrap());
    assert!(outcome.can_access_read_api());
}

#[tokio::test]
async fn test_static_key_configuration_is_fail_closed() {
    let (resolver, _backend) = resolver_with(AuthConfig {
        upload_api_keys: vec!["u1".to_string()],
        publish_api_keys: vec!["p1".to_string()],
        ..AuthConfig::default()
    });

    // A wrong key resolves to anonymous with both defaults revoked.
    let outcome = resolver.resolve(&api_key("wrong")).await.unwrap();
    assert!(outcome.is_anonymous());
    assert!(!outcome.can_publish_module_version("ns").await.unwrap());
    assert!(!outcome.can_upload_module_version("ns").await.unwrap());

    // The right key grants exactly its own operation.
    let outcome = resolver.resolve(&api_key("u1")).await.unwrap();
    assert_eq!(outcome.strategy_name(), "upload_api_key");
    assert!(outcome.can_upload_module_version("ns").await.unwrap());
    assert!(!outcome.can_publish_module_version("ns").await.unwrap());
}

#[tokio::test]
async fn test_saml_outcome_carries_rbac_permissions() {
    let (resolver, backend) = resolver_with(saml_config());
    backend.upsert_namespace(Namespace::new("teamns"));
    backend.upsert_user_group(UserGroup::new("g1", false));
    backend.upsert_user_group(UserGroup::new("g2", false));
    backend.set_permission("g1", "teamns", PermissionKind::Modify);
    backend.set_permission("g2", "teamns", PermissionKind::Full);

    let session = Session::new(AuthenticationType::SessionSaml, 60).with_provider_data(
        FederatedSessionData {
            username: Some("user@example.com".to_string()),
            groups: vec!["g1".to_string(), "g2".to_string()],
            session_expiry: Some(Utc::now() + Duration::minutes(30)),
            id_token: None,
        },
    );
    let session_id = session.id.clone();
    backend.create_session(session).await.unwrap();

    let outcome = resolver.resolve(&session_cookie(&session_id)).await.unwrap();
    assert_eq!(outcome.strategy_name(), "saml");
    assert_eq!(outcome.username().as_deref(), Some("user@example.com"));

    // FULL from one group dominates MODIFY from the other.
    assert!(
        outcome
            .check_namespace_access(PermissionKind::Full, "teamns")
            .await
            .unwrap()
    );
    let permissions = outcome.all_namespace_permissions().await.unwrap();
    assert_eq!(permissions["teamns"], PermissionKind::Full);
}

#[tokio::test]
async fn test_deleted_session_falls_through_to_anonymous() {
    let (resolver, backend) = resolver_with(admin_config());

    let session = Session::new(AuthenticationType::SessionPassword, 60);
    let session_id = session.id.clone();
    backend.create_session(session).await.unwrap();

    let outcome = resolver.resolve(&session_cookie(&session_id)).await.unwrap();
    assert_eq!(outcome.strategy_name(), "admin_session");

    backend.delete_session(&session_id).await.unwrap();
    let outcome = resolver.resolve(&session_cookie(&session_id)).await.unwrap();
    assert!(outcome.is_anonymous());
}

#[tokio::test]
async fn test_context_returns_identical_outcome() {
    let (resolver, _backend) = resolver_with(admin_config());
    let context = AuthContext::new(resolver, api_key("abc123"));

    let first = context.outcome().await.unwrap();
    let second = context.outcome().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

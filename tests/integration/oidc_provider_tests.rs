//! OpenID Connect provider cache integration tests

use terrareg_rs::config::OidcConfig;
use terrareg_rs::provider::OidcProvider;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn discovery_body(issuer: &str) -> serde_json::Value {
    serde_json::json!({
        "issuer": issuer,
        "jwks_uri": format!("{}/jwks", issuer),
        "authorization_endpoint": format!("{}/authorize", issuer),
        "token_endpoint": format!("{}/token", issuer),
    })
}

fn provider_config(issuer: &str, cache_secs: u64) -> OidcConfig {
    OidcConfig {
        issuer_url: Some(issuer.to_string()),
        client_id: Some("registry".to_string()),
        client_secret: None,
        metadata_cache_secs: cache_secs,
    }
}

#[tokio::test]
async fn test_metadata_served_from_cache_while_fresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discovery_body(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OidcProvider::new(provider_config(&server.uri(), 3600));

    let first = provider.metadata().await.unwrap();
    let second = provider.metadata().await.unwrap();

    assert_eq!(first.issuer, server.uri());
    assert_eq!(first.jwks_uri, second.jwks_uri);
    // expect(1) on the mock asserts the second call never hit the network.
}

#[tokio::test]
async fn test_metadata_refetched_after_staleness() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discovery_body(&server.uri())))
        .expect(2)
        .mount(&server)
        .await;

    // Zero staleness interval: every call refreshes.
    let provider = OidcProvider::new(provider_config(&server.uri(), 0));

    provider.metadata().await.unwrap();
    provider.metadata().await.unwrap();
}

#[tokio::test]
async fn test_metadata_fetch_failure_is_single_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OidcProvider::new(provider_config(&server.uri(), 3600));
    assert!(provider.metadata().await.is_err());
}

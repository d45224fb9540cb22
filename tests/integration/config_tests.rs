//! Configuration loading integration tests

use std::io::Write;
use tempfile::NamedTempFile;
use terrareg_rs::config::AppConfig;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config_file() {
    let file = write_config(
        r#"
server:
  host: 0.0.0.0
  port: 8080
auth:
  admin_authentication_token: abc123
  secret_key: change-me
  upload_api_keys:
    - k1
    - k2
  analytics_auth_keys:
    - tfkey:prod
  enable_access_controls: true
  allow_unauthenticated_access: false
  openid_connect:
    issuer_url: https://idp.example.com
    client_id: registry
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.auth.admin_token(), Some("abc123"));
    assert_eq!(config.auth.upload_api_keys, vec!["k1", "k2"]);
    assert_eq!(config.auth.analytics_auth_keys, vec!["tfkey:prod"]);
    assert!(config.auth.enable_access_controls);
    assert!(!config.auth.allow_unauthenticated_access);
    assert!(config.auth.openid_connect.is_configured());
    assert!(config.validate().is_ok());
}

#[test]
fn test_defaults_for_empty_file() {
    let file = write_config("{}\n");

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.server.port, 5000);
    assert!(config.auth.admin_token().is_none());
    assert!(config.auth.allow_unauthenticated_access);
    assert!(!config.auth.enable_access_controls);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_sso_without_secret() {
    let file = write_config(
        r#"
auth:
  openid_connect:
    issuer_url: https://idp.example.com
    client_id: registry
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    let error = config.validate().unwrap_err();
    assert!(error.contains("secret_key"));
}

#[test]
fn test_malformed_yaml_rejected() {
    let file = write_config("auth: [not: a mapping\n");
    assert!(AppConfig::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_rejected() {
    assert!(AppConfig::from_file("/nonexistent/registry.yaml").is_err());
}

//! Integration tests for the device-code credential provider
//!
//! The identity platform is replaced by a wiremock server; the browser is
//! never launched and prompts are swallowed.

use chrono::{Duration, Utc};
use cloudpush_core::ports::{CredentialProvider, Tokens};
use cloudpush_graph::auth::{DeviceCodeCredentialProvider, TokenCache};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common;

fn provider(server: &MockServer, cache: &std::path::Path) -> DeviceCodeCredentialProvider {
    DeviceCodeCredentialProvider::new(common::auth_settings(), cache)
        .with_authority(server.uri())
        .without_browser()
        .with_prompt(|_| {})
}

#[tokio::test]
async fn test_device_flow_acquires_and_caches_token() {
    let server = MockServer::start().await;
    common::mount_device_code(&server).await;
    common::mount_token(&server, "device_code", "device-access-token").await;

    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("onedrive_auth_cache.json");

    let token = provider(&server, &cache_path).acquire().await.unwrap();
    assert_eq!(token, "device-access-token");

    let cache = TokenCache::load(&cache_path).unwrap();
    let cached = cache.tokens_for(&common::auth_settings()).unwrap();
    assert_eq!(cached.access_token, "device-access-token");
    assert_eq!(cached.refresh_token.as_deref(), Some("refresh-from-server"));
    assert!(!cached.is_expired());
}

#[tokio::test]
async fn test_second_acquire_reuses_cache() {
    let server = MockServer::start().await;
    common::mount_device_code(&server).await;
    common::mount_token(&server, "device_code", "device-access-token").await;

    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("cache.json");

    let first = provider(&server, &cache_path).acquire().await.unwrap();
    let second = provider(&server, &cache_path).acquire().await.unwrap();
    assert_eq!(first, second);

    let device_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path().ends_with("/devicecode"))
        .count();
    assert_eq!(device_requests, 1);
}

#[tokio::test]
async fn test_expired_cache_refreshes_silently() {
    let server = MockServer::start().await;
    common::mount_token(&server, "refresh_token", "refreshed-access-token").await;

    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("cache.json");

    let mut cache = TokenCache::default();
    cache.replace(
        &common::auth_settings(),
        Tokens {
            access_token: "stale".to_string(),
            refresh_token: Some("old-refresh".to_string()),
            expires_at: Utc::now() - Duration::minutes(1),
        },
    );
    cache.save(&cache_path).unwrap();

    let token = provider(&server, &cache_path).acquire().await.unwrap();
    assert_eq!(token, "refreshed-access-token");

    let reloaded = TokenCache::load(&cache_path).unwrap();
    assert_eq!(
        reloaded
            .tokens_for(&common::auth_settings())
            .unwrap()
            .access_token,
        "refreshed-access-token"
    );
}

#[tokio::test]
async fn test_device_flow_error_is_fatal_and_leaves_no_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/v2.0/devicecode", common::TENANT).as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS700016: Application not found"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("cache.json");

    let err = provider(&server, &cache_path).acquire().await.unwrap_err();
    assert!(format!("{err:#}").contains("Device flow error"));
    assert!(!cache_path.exists());
}

/*
[INPUT]:  Mock settings and account responses
[OUTPUT]: Test results for the settings cache
[POS]:    Integration tests - settings fetch and persistence
[UPDATE]: When settings endpoints or storage keys change
*/

mod common;

use std::sync::Arc;

use common::{CLIENT_ID, client_for, setup_mock_server};
use dimo_login_adapter::storage::keys;
use dimo_login_adapter::{
    ApiClient, ClientConfig, LocalStore, PrivateSettings, PublicSettings, SettingsCache,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_public_settings(server: &MockServer, client_id: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/public/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "clientId": client_id,
            "loginUrl": "https://login.dimo.org",
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_public_settings_updates_memory_and_store() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    let cache = SettingsCache::new(client, store.clone());
    mount_public_settings(&server, CLIENT_ID).await;

    let fetched = cache.fetch_public_settings().await.expect("fetch should succeed");

    assert_eq!(fetched.client_id, CLIENT_ID);
    assert_eq!(cache.public_settings(), Some(fetched.clone()));
    let stored: PublicSettings = store
        .get_json(keys::PUBLIC_SETTINGS)
        .expect("store should hold settings");
    assert_eq!(stored, fetched);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_value() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    let cache = SettingsCache::new(client, store.clone());

    mount_public_settings(&server, CLIENT_ID).await;
    Mock::given(method("GET"))
        .and(path("/v1/public/settings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let first = cache.fetch_public_settings().await;
    assert!(first.is_some());
    let stored_before = store.get_item(keys::PUBLIC_SETTINGS);

    let second = cache.fetch_public_settings().await;

    assert!(second.is_none());
    assert_eq!(cache.public_settings(), first);
    assert_eq!(store.get_item(keys::PUBLIC_SETTINGS), stored_before);
}

#[tokio::test]
async fn test_unexpected_body_counts_as_failure() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    let cache = SettingsCache::new(client, store.clone());

    Mock::given(method("GET"))
        .and(path("/v1/public/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    assert!(cache.fetch_public_settings().await.is_none());
    assert!(cache.public_settings().is_none());
    assert!(store.get_item(keys::PUBLIC_SETTINGS).is_none());
}

#[tokio::test]
async fn test_fetch_account_info_returns_private_settings() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    assert!(store.set_item(keys::TOKEN, "jwt").is_ok());
    let cache = SettingsCache::new(client, store.clone());

    Mock::given(method("GET"))
        .and(path("/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "environment": "dev",
            "accountsApiUrl": format!("{}/accounts", server.uri()),
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/api/account/driver@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "subOrganizationId": "org-1",
            "isDeployed": true,
            "hasPasskey": true,
            "emailVerified": false,
            "authenticators": [{"id": "a1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let private: PrivateSettings = cache
        .fetch_private_settings()
        .await
        .expect("private settings should load");
    let returned = cache.fetch_account_info("driver@example.com").await;

    assert_eq!(returned, Some(private));
    let account = cache.account_info().expect("account info cached");
    assert_eq!(account.sub_organization_id, "org-1");
    assert!(account.has_passkey);
    assert!(store.get_item(keys::ACCOUNT_INFO).is_some());
}

#[tokio::test]
async fn test_cache_survives_restart_through_store() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    mount_public_settings(&server, CLIENT_ID).await;

    let cache = SettingsCache::new(client.clone(), store.clone());
    assert!(cache.fetch_public_settings().await.is_some());
    drop(cache);

    let restarted = SettingsCache::new(client, store);
    let settings = restarted.public_settings().expect("seeded from store");
    assert_eq!(settings.client_id, CLIENT_ID);
}

#[tokio::test]
async fn test_failed_private_fetch_keeps_previous_value() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    let cache = SettingsCache::new(client, store.clone());

    Mock::given(method("GET"))
        .and(path("/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "environment": "prod",
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/settings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "unauthorized",
        })))
        .mount(&server)
        .await;

    let first = cache.fetch_private_settings().await;
    assert!(first.is_some());
    let stored_before = store.get_item(keys::PRIVATE_SETTINGS);

    assert!(cache.fetch_private_settings().await.is_none());
    assert_eq!(cache.private_settings(), first);
    assert_eq!(store.get_item(keys::PRIVATE_SETTINGS), stored_before);
}

#[tokio::test]
async fn test_failed_account_lookup_keeps_previous_value() {
    let server = setup_mock_server().await;
    let (client, store) = client_for(&server);
    let previous = serde_json::json!({
        "subOrganizationId": "org-old",
        "isDeployed": false,
        "hasPasskey": false,
        "emailVerified": true,
        "authenticators": []
    });
    assert!(store.set_json(keys::ACCOUNT_INFO, &previous).is_ok());
    assert!(
        store
            .set_json(
                keys::PRIVATE_SETTINGS,
                &serde_json::json!({ "accountsApiUrl": format!("{}/accounts", server.uri()) }),
            )
            .is_ok()
    );
    let cache = SettingsCache::new(client, store.clone());
    let stored_before = store.get_item(keys::ACCOUNT_INFO);

    Mock::given(method("GET"))
        .and(path("/accounts/api/account/missing@example.com"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(cache.fetch_account_info("missing@example.com").await.is_none());
    let account = cache.account_info().expect("previous record stays cached");
    assert_eq!(account.sub_organization_id, "org-old");
    assert_eq!(store.get_item(keys::ACCOUNT_INFO), stored_before);
}

#[tokio::test]
async fn test_store_write_failure_keeps_cache_and_store_aligned() {
    let server = setup_mock_server().await;
    let dir = std::env::temp_dir().join(format!("dimo-settings-{}", uuid::Uuid::new_v4()));
    let file = dir.join("store.json");
    let store = Arc::new(LocalStore::open(&file).expect("store opens"));
    let client = Arc::new(
        ApiClient::with_config_and_base_url(ClientConfig::default(), &server.uri(), store.clone())
            .expect("client should build"),
    );
    let cache = SettingsCache::new(client, store.clone());

    Mock::given(method("GET"))
        .and(path("/v1/public/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "clientId": CLIENT_ID,
            "loginUrl": "https://login.dimo.org",
        })))
        .mount(&server)
        .await;

    // A directory at the store path makes the write fail.
    std::fs::create_dir_all(&file).expect("create blocking dir");

    assert!(cache.fetch_public_settings().await.is_none());
    assert!(cache.public_settings().is_none());
    assert!(store.get_item(keys::PUBLIC_SETTINGS).is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for dimo-login-adapter tests

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dimo_login_adapter::{ApiClient, ClientConfig, LocalStore};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server, plus the store it reads the token from
pub fn client_for(server: &MockServer) -> (Arc<ApiClient>, Arc<LocalStore>) {
    let store = Arc::new(LocalStore::in_memory());
    let client =
        ApiClient::with_config_and_base_url(ClientConfig::default(), &server.uri(), store.clone())
            .expect("client should build");
    (Arc::new(client), store)
}

/// Unsigned JWT carrying `claims`
#[allow(dead_code)]
pub fn mock_jwt_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    format!("{header}.{payload}.signature")
}

/// Client id of the expected 42-char shape
#[allow(dead_code)]
pub const CLIENT_ID: &str = "0x1111111111111111111111111111111111111111";

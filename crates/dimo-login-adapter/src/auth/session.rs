/*
[INPUT]:  JWT handed over by the login SDK
[OUTPUT]: Stored token, authenticated status, backend session cookie, redirect
[POS]:    Auth layer - JWT-based login success path
[UPDATE]: When the session endpoint or the post-login destination changes
*/

use std::sync::Arc;

use reqwest::Method;
use tracing::{error, info, warn};
use url::Url;

use crate::auth::{AuthState, JwtManager};
use crate::http::client::read_body;
use crate::http::{ApiClient, LoginError, Result};
use crate::storage::keys;
use crate::login::Redirect;
use crate::types::{AuthStatus, JwtSessionResponse};

pub const LOGIN_JWT_ENDPOINT: &str = "/login-jwt";

/// What a JWT login produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Full-page navigation target
    pub redirect: Redirect,
    /// Backend session id, when `/login-jwt` answered
    pub session_id: Option<String>,
}

/// Handles the login SDK's success callback
#[derive(Debug, Clone)]
pub struct JwtSessionLogin {
    client: Arc<ApiClient>,
    status: AuthState,
    jwt_manager: JwtManager,
    vehicles_base: Url,
}

impl JwtSessionLogin {
    /// `vehicles_base` is the origin that serves the vehicles page
    pub fn new(client: Arc<ApiClient>, status: AuthState, vehicles_base: Url) -> Self {
        let jwt_manager = JwtManager::new(client.store().clone());
        Self {
            client,
            status,
            jwt_manager,
            vehicles_base,
        }
    }

    pub fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    /// Store the token, mark the user signed in, hand the JWT to the backend.
    ///
    /// The token is treated as opaque: it is forwarded even when its claims
    /// cannot be read. Store failures and a failed `/login-jwt` call are
    /// logged and do not stop the redirect.
    pub async fn on_success(&self, token: &str) -> Result<SessionOutcome> {
        match self.jwt_manager.set_token(token) {
            Ok(token_data) => {
                info!(address = ?token_data.ethereum_address, "login SDK returned a token");
                if let Some(address) = &token_data.ethereum_address {
                    self.remember_wallet_address(address);
                }
            }
            Err(err) => warn!(error = %err, "failed to store token"),
        }
        self.status.set(AuthStatus::Authenticated);

        let session_id = match self.establish_session(token).await {
            Ok(session) => {
                info!("session established");
                Some(session.session_id)
            }
            Err(err) => {
                error!(error = %err, "failed to establish session");
                None
            }
        };

        Ok(SessionOutcome {
            redirect: Redirect::vehicles(&self.vehicles_base)?,
            session_id,
        })
    }

    /// Account address handed back by the login flow, kept under `walletAddress`
    fn remember_wallet_address(&self, address: &str) {
        if let Err(err) = self.client.store().set_item(keys::WALLET_ADDRESS, address) {
            warn!(error = %err, "failed to persist wallet address");
        }
    }

    /// POST /login-jwt with `{jwt}`; the cookie jar keeps whatever the backend sets
    pub async fn establish_session(&self, token: &str) -> Result<JwtSessionResponse> {
        let builder = self
            .client
            .request(Method::POST, LOGIN_JWT_ENDPOINT)?
            .json(&serde_json::json!({ "jwt": token }));

        let response = builder.send().await?;
        let status = response.status();
        let body = read_body(response).await?;
        if !status.is_success() {
            return Err(LoginError::http_error(status, body.error_message()));
        }
        body.json()
    }
}

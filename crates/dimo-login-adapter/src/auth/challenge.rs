/*
[INPUT]:  Connected wallet address, backend challenge, wallet signature
[OUTPUT]: Challenge messages, verification result, auth status flip
[POS]:    Auth layer - challenge/response adapter for wallet sign-in
[UPDATE]: When challenge endpoints or their payloads change
*/

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Method;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::AuthState;
use crate::http::client::read_body;
use crate::http::{ApiClient, LoginError, Result};
use crate::types::{AuthStatus, ChallengeMessage};

pub const GENERATE_CHALLENGE_ENDPOINT: &str = "/auth/web3/generate_challenge";
pub const SUBMIT_CHALLENGE_ENDPOINT: &str = "/auth/web3/submit_challenge";

/// Callbacks a wallet connection drives, in order, during one sign-in.
///
/// Any `Err` means "this step failed, return to idle".
#[async_trait]
pub trait AuthenticationAdapter: Send + Sync {
    type Message: Send + Sync;

    /// Fetch a fresh challenge payload
    async fn get_nonce(&self) -> Result<String>;

    /// Turn the challenge payload into a message
    fn create_message(&self, nonce: &str) -> Result<Self::Message>;

    /// Exact text the wallet must sign
    fn get_message_body(&self, message: &Self::Message) -> String;

    /// Submit the signature; `Ok(true)` means signed in
    async fn verify(&self, message: &Self::Message, signature: &str) -> Result<bool>;

    /// Fire-and-forget backend sign-out
    fn sign_out(&self);
}

/// Adapter that bridges a wallet to the backend's web3 challenge endpoints
#[derive(Debug, Clone)]
pub struct ChallengeAdapter {
    client: Arc<ApiClient>,
    status: AuthState,
    connected_address: Arc<RwLock<Option<String>>>,
}

impl ChallengeAdapter {
    pub fn new(client: Arc<ApiClient>, status: AuthState) -> Self {
        Self {
            client,
            status,
            connected_address: Arc::new(RwLock::new(None)),
        }
    }

    pub fn status(&self) -> &AuthState {
        &self.status
    }

    /// Record the account the wallet reports as connected.
    ///
    /// Kept in memory only. `walletAddress` in the store belongs to the
    /// login SDK path and is not touched here.
    pub fn set_connected_address(&self, address: Option<String>) {
        let mut guard = self
            .connected_address
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *guard = address;
    }

    pub fn connected_address(&self) -> Option<String> {
        let guard = self
            .connected_address
            .read()
            .unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Spawn `GET /api/logout` and return its handle.
    ///
    /// Local status and storage are left alone. Returns `None` outside a
    /// tokio runtime.
    pub fn spawn_sign_out(&self) -> Option<JoinHandle<()>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("sign-out skipped: no async runtime");
            return None;
        };
        let client = self.client.clone();
        Some(handle.spawn(async move {
            let response = client.logout().await;
            debug!(success = response.success, status = ?response.status, "sign-out sent");
        }))
    }
}

#[async_trait]
impl AuthenticationAdapter for ChallengeAdapter {
    type Message = ChallengeMessage;

    /// POST /auth/web3/generate_challenge
    ///
    /// The body text is returned untouched; it is itself a JSON
    /// `{state, challenge}` document.
    async fn get_nonce(&self) -> Result<String> {
        let address = self.connected_address().unwrap_or_default();
        let builder = self
            .client
            .request(Method::POST, GENERATE_CHALLENGE_ENDPOINT)?
            .form(&[("address", address.as_str())]);

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = read_body(response)
                .await
                .map(|body| body.error_message())
                .unwrap_or_else(|err| err.to_string());
            return Err(LoginError::NonceFetch {
                status: status.as_u16(),
                message: detail,
            });
        }

        let nonce = response.text().await?;
        debug!(address = %address, "challenge issued");
        Ok(nonce)
    }

    fn create_message(&self, nonce: &str) -> Result<ChallengeMessage> {
        Ok(serde_json::from_str(nonce)?)
    }

    fn get_message_body(&self, message: &ChallengeMessage) -> String {
        message.challenge.clone()
    }

    /// POST /auth/web3/submit_challenge
    async fn verify(&self, message: &ChallengeMessage, signature: &str) -> Result<bool> {
        let builder = self
            .client
            .request(Method::POST, SUBMIT_CHALLENGE_ENDPOINT)?
            .form(&[
                ("state", message.state.as_str()),
                ("signature", signature),
            ]);

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = read_body(response)
                .await
                .map(|body| body.error_message())
                .unwrap_or_else(|err| err.to_string());
            return Err(LoginError::Verification {
                status: status.as_u16(),
                message: detail,
            });
        }

        info!(state = %message.state, "challenge verified");
        self.status.set(AuthStatus::Authenticated);
        Ok(true)
    }

    fn sign_out(&self) {
        let _ = self.spawn_sign_out();
    }
}

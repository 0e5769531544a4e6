/*
[INPUT]:  App configuration, local store, wallet signers and SDK tokens
[OUTPUT]: Login links, redirects and session outcomes for the active flow
[POS]:    App layer - wires services together for one login flow
[UPDATE]: When flows are added or their wiring changes
*/

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use url::Url;

use dimo_login_adapter::{
    AccountInfo, ApiClient, AuthFlow, AuthState, AuthStatus, ChallengeAdapter, JwtSessionLogin,
    LocalStore, LoginError, Redirect, Result, SdkLoginRequest, SessionOutcome, SettingsCache,
    WalletSigner, login_link,
};

use crate::config::AppConfig;

enum ActiveFlow {
    Wallet(ChallengeAdapter),
    Sdk(JwtSessionLogin, SdkLoginRequest),
    JwtLink(JwtSessionLogin),
}

impl ActiveFlow {
    fn kind(&self) -> AuthFlow {
        match self {
            ActiveFlow::Wallet(_) => AuthFlow::Wallet,
            ActiveFlow::Sdk(..) => AuthFlow::Sdk,
            ActiveFlow::JwtLink(_) => AuthFlow::JwtLink,
        }
    }
}

/// One login app instance: shared services plus exactly one active flow
pub struct LoginApp {
    origin: Url,
    vehicles_base: Url,
    client: Arc<ApiClient>,
    settings: SettingsCache,
    status: AuthState,
    flow: ActiveFlow,
}

impl LoginApp {
    /// Build the app with the file-backed store from the configuration
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let path = config.storage_path();
        let store = LocalStore::open(&path)
            .with_context(|| format!("open local store {}", path.display()))?;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: &AppConfig, store: Arc<LocalStore>) -> anyhow::Result<Self> {
        let origin = config.origin_url()?;
        let client = match config.api_base_url()? {
            // An explicit backend wins over the hostname heuristic.
            Some(base) => ApiClient::with_config_and_base_url(
                config.client_config(),
                base.as_str(),
                store.clone(),
            ),
            None => ApiClient::with_config(config.client_config(), &origin, store.clone()),
        }
        .context("build API client")?;
        let client = Arc::new(client);

        let vehicles_base = client.base_url().clone();
        let status = AuthState::new();
        let settings = SettingsCache::new(client.clone(), store);

        let flow = match config.auth_flow {
            AuthFlow::Wallet => ActiveFlow::Wallet(ChallengeAdapter::new(client.clone(), status.clone())),
            AuthFlow::Sdk => {
                let request = config
                    .sdk_request()
                    .context("sdk flow needs client_id, redirect_uri and api_key")?;
                let login = JwtSessionLogin::new(client.clone(), status.clone(), vehicles_base.clone());
                ActiveFlow::Sdk(login, request)
            }
            AuthFlow::JwtLink => ActiveFlow::JwtLink(JwtSessionLogin::new(
                client.clone(),
                status.clone(),
                vehicles_base.clone(),
            )),
        };

        info!(flow = %flow.kind(), base_url = %client.base_url(), "login app ready");

        Ok(Self {
            origin,
            vehicles_base,
            client,
            settings,
            status,
            flow,
        })
    }

    pub fn flow(&self) -> AuthFlow {
        self.flow.kind()
    }

    pub fn status(&self) -> AuthStatus {
        self.status.status()
    }

    pub fn settings(&self) -> &SettingsCache {
        &self.settings
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Hosted login link built from fresh public settings, else the cached ones.
    ///
    /// `Ok(None)` means no usable client id is configured.
    pub async fn login_link(&self) -> Result<Option<Url>> {
        self.require(AuthFlow::JwtLink)?;
        let settings = match self.settings.fetch_public_settings().await {
            Some(settings) => Some(settings),
            None => {
                warn!("public settings fetch failed; using last known value");
                self.settings.public_settings()
            }
        };
        Ok(settings.and_then(|settings| login_link(&settings, &self.origin)))
    }

    /// URL the login SDK opens
    pub fn sdk_login_url(&self) -> Result<Url> {
        match &self.flow {
            ActiveFlow::Sdk(_, request) => request.login_url(),
            other => Err(LoginError::FlowInactive(format!(
                "{} (active: {})",
                AuthFlow::Sdk,
                other.kind()
            ))),
        }
    }

    /// Sign in with `wallet`, then wait for the status flip and redirect
    pub async fn wallet_sign_in(&self, wallet: &dyn WalletSigner) -> Result<Redirect> {
        let ActiveFlow::Wallet(adapter) = &self.flow else {
            return Err(self.inactive(AuthFlow::Wallet));
        };
        adapter.connect(wallet).await?;
        self.status.wait_authenticated().await;
        Redirect::vehicles(&self.vehicles_base)
    }

    /// Success callback of the SDK or of the login-link return page
    pub async fn login_with_jwt(&self, token: &str) -> Result<SessionOutcome> {
        match &self.flow {
            ActiveFlow::Sdk(login, _) | ActiveFlow::JwtLink(login) => login.on_success(token).await,
            ActiveFlow::Wallet(_) => Err(self.inactive(AuthFlow::Sdk)),
        }
    }

    /// Freshly fetched account record for `email`.
    ///
    /// Fails instead of falling back to a previously cached record.
    pub async fn account_info(&self, email: &str) -> anyhow::Result<AccountInfo> {
        self.settings
            .fetch_account_info(email)
            .await
            .with_context(|| format!("account lookup for {email} failed"))?;
        self.settings
            .account_info()
            .context("account info missing after lookup")
    }

    /// Send the backend sign-out and wait for it to be on the wire.
    ///
    /// Local status is not reset.
    pub async fn sign_out(&self) {
        let handle = match &self.flow {
            ActiveFlow::Wallet(adapter) => adapter.spawn_sign_out(),
            ActiveFlow::Sdk(..) | ActiveFlow::JwtLink(_) => {
                let client = self.client.clone();
                Some(tokio::spawn(async move {
                    let _ = client.logout().await;
                }))
            }
        };
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "sign-out task failed");
            }
        }
    }

    fn require(&self, flow: AuthFlow) -> Result<()> {
        if self.flow.kind() == flow {
            Ok(())
        } else {
            Err(self.inactive(flow))
        }
    }

    fn inactive(&self, wanted: AuthFlow) -> LoginError {
        LoginError::FlowInactive(format!("{wanted} (active: {})", self.flow.kind()))
    }
}

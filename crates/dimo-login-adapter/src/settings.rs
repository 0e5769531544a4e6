/*
[INPUT]:  API client, local store
[OUTPUT]: Last-known public/private settings and account info
[POS]:    Settings layer - fetch-and-persist cache for configuration blobs
[UPDATE]: When settings shapes, storage keys or fetch rules change
*/

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::http::ApiClient;
use crate::storage::{LocalStore, keys};
use crate::types::{AccountInfo, ApiResponse, PrivateSettings, PublicSettings};

#[derive(Debug, Default)]
struct Cached {
    public_settings: Option<PublicSettings>,
    private_settings: Option<PrivateSettings>,
    account_info: Option<AccountInfo>,
}

/// Settings fetched from the backend and mirrored into the local store.
///
/// There is no freshness policy: each fetch overwrites on success and leaves
/// everything untouched on failure.
#[derive(Debug)]
pub struct SettingsCache {
    client: Arc<ApiClient>,
    store: Arc<LocalStore>,
    cached: RwLock<Cached>,
}

impl SettingsCache {
    /// Build the cache, seeding it from whatever the store already holds
    pub fn new(client: Arc<ApiClient>, store: Arc<LocalStore>) -> Self {
        let cached = Cached {
            public_settings: store.get_json(keys::PUBLIC_SETTINGS),
            private_settings: store.get_json(keys::PRIVATE_SETTINGS),
            account_info: store.get_json(keys::ACCOUNT_INFO),
        };
        Self {
            client,
            store,
            cached: RwLock::new(cached),
        }
    }

    pub fn public_settings(&self) -> Option<PublicSettings> {
        self.read().public_settings.clone()
    }

    pub fn private_settings(&self) -> Option<PrivateSettings> {
        self.read().private_settings.clone()
    }

    pub fn account_info(&self) -> Option<AccountInfo> {
        self.read().account_info.clone()
    }

    /// Smart-contract account address handed back by the login flow.
    ///
    /// This is the organisation wallet, not the user's signing key address.
    pub fn org_smart_contract_address(&self) -> Option<String> {
        self.store.get_item(keys::WALLET_ADDRESS)
    }

    pub async fn fetch_public_settings(&self) -> Option<PublicSettings> {
        let response = self.client.get_public_settings().await;
        let settings: PublicSettings = decode(response, "public settings")?;
        if !self.persist(keys::PUBLIC_SETTINGS, &settings) {
            return None;
        }
        self.write().public_settings = Some(settings.clone());
        Some(settings)
    }

    pub async fn fetch_private_settings(&self) -> Option<PrivateSettings> {
        let response = self.client.get_private_settings().await;
        let settings: PrivateSettings = decode(response, "private settings")?;
        if !self.persist(keys::PRIVATE_SETTINGS, &settings) {
            return None;
        }
        self.write().private_settings = Some(settings.clone());
        Some(settings)
    }

    /// Fetch the passkey account record for `email`.
    ///
    /// On success the account info is cached, but the value returned is the
    /// cached *private settings*; read [`SettingsCache::account_info`] for
    /// the record itself. Needs `accountsApiUrl` from the private settings.
    pub async fn fetch_account_info(&self, email: &str) -> Option<PrivateSettings> {
        let accounts_api_url = self
            .read()
            .private_settings
            .as_ref()
            .and_then(|settings| settings.accounts_api_url.clone());
        let Some(accounts_api_url) = accounts_api_url else {
            warn!(email, "accountsApiUrl unknown; fetch private settings first");
            return None;
        };

        let response = self.client.get_account_info(&accounts_api_url, email).await;
        let info: AccountInfo = decode(response, "account info")?;
        if !self.persist(keys::ACCOUNT_INFO, &info) {
            return None;
        }

        let mut cached = self.write();
        cached.account_info = Some(info);
        cached.private_settings.clone()
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.store.set_json(key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "failed to persist settings");
                false
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Cached> {
        self.cached.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Cached> {
        self.cached.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn decode<T: DeserializeOwned>(response: ApiResponse, what: &str) -> Option<T> {
    match response.json() {
        Ok(value) => {
            debug!(what, "settings fetched");
            Some(value)
        }
        Err(err) => {
            warn!(what, error = %err, "settings fetch failed");
            None
        }
    }
}

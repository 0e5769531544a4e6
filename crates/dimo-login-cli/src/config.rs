/*
[INPUT]:  Optional YAML configuration file, DIMO_* environment variables
[OUTPUT]: Parsed and validated app configuration
[POS]:    Configuration layer - login app setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment as EnvSource, File};
use serde::{Deserialize, Serialize};
use url::Url;

use dimo_login_adapter::{AuthFlow, ClientConfig, Environment, LoginMode, SdkLoginRequest};

/// Prefix of the environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "DIMO";

/// Top-level configuration for the login app
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin the app is served from; drives the API base URL choice
    pub origin: String,
    /// Origin serving the vehicles page (`DIMO_API_BASEURL`)
    #[serde(alias = "api_baseurl")]
    pub api_base_url: Option<String>,
    /// Developer license address
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub api_key: Option<String>,
    pub environment: Environment,
    pub permission_template_id: Option<String>,
    pub project_id: Option<String>,
    pub mode: LoginMode,
    /// The one login flow this app instance runs
    pub auth_flow: AuthFlow,
    /// Local store file; defaults under the user data directory
    pub storage_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3007".to_string(),
            api_base_url: None,
            client_id: None,
            redirect_uri: None,
            api_key: None,
            environment: Environment::Production,
            permission_template_id: None,
            project_id: None,
            mode: LoginMode::Popup,
            auth_flow: AuthFlow::Wallet,
            storage_path: None,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load from an optional YAML file, overridden by `DIMO_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, EnvSource::with_prefix(ENV_PREFIX))
    }

    /// Load with an explicit environment source
    pub fn from_sources(path: Option<&Path>, env: EnvSource) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Self = builder
            .add_source(env)
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("decode configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.origin_url()?;
        self.api_base_url()?;

        if self.auth_flow == AuthFlow::Sdk {
            let client_id = self
                .client_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| anyhow!("client_id is required for the sdk flow"))?;
            if !client_id.starts_with("0x") || client_id.len() != 42 {
                return Err(anyhow!("client_id must be a 0x-prefixed 20-byte address"));
            }
            if self.redirect_uri.as_deref().is_none_or(str::is_empty) {
                return Err(anyhow!("redirect_uri is required for the sdk flow"));
            }
            if self.api_key.as_deref().is_none_or(str::is_empty) {
                return Err(anyhow!("api_key is required for the sdk flow"));
            }
        }
        Ok(())
    }

    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin).with_context(|| format!("invalid origin {:?}", self.origin))
    }

    pub fn api_base_url(&self) -> Result<Option<Url>> {
        self.api_base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid api_base_url {raw:?}")))
            .transpose()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientConfig::default()
        }
    }

    /// Store file to use, falling back to `<data dir>/dimo-login/storage.json`
    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        let base = dirs::data_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("dimo-login").join("storage.json")
    }

    /// SDK initialisation parameters, when the sdk fields are present
    pub fn sdk_request(&self) -> Option<SdkLoginRequest> {
        Some(SdkLoginRequest {
            client_id: self.client_id.clone()?,
            redirect_uri: self.redirect_uri.clone()?,
            api_key: self.api_key.clone()?,
            environment: self.environment,
            permission_template_id: self.permission_template_id.clone(),
            mode: self.mode,
        })
    }
}

/*
[INPUT]:  HTTP configuration (app origin, timeouts), local store for the bearer token
[OUTPUT]: Configured reqwest client and the uniform call_api convention
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing the calling convention
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use tracing::{debug, error};

use crate::http::Result;
use crate::storage::{LocalStore, keys};
use crate::types::{ApiResponse, ResponseBody};

/// Backend used when the app runs on a developer machine
pub const DEFAULT_LOCAL_DEV_URL: &str = "https://localdev.dimo.org:3007";

const LOCAL_HOSTNAMES: [&str; 3] = ["localhost", "localdev.dimo.org", ""];

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// True for the hostnames that mean "running locally"
pub fn is_localhost(hostname: &str) -> bool {
    LOCAL_HOSTNAMES.contains(&hostname)
}

/// Pick the API base for an app served from `origin`.
///
/// Only scheme, host and port count; any path on `origin` is dropped.
pub fn resolve_base_url(origin: &Url) -> Result<Url> {
    if is_localhost(origin.host_str().unwrap_or_default()) {
        Ok(Url::parse(DEFAULT_LOCAL_DEV_URL)?)
    } else {
        Ok(Url::parse(&origin.origin().ascii_serialization())?)
    }
}

/// Shared HTTP client for the login backend.
///
/// Holds a cookie jar so session cookies set by the backend ride along on
/// later requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    store: Arc<LocalStore>,
}

impl ApiClient {
    /// Client for an app served from `origin`, base URL chosen by hostname
    pub fn new(origin: &Url, store: Arc<LocalStore>) -> Result<Self> {
        Self::with_config(ClientConfig::default(), origin, store)
    }

    pub fn with_config(config: ClientConfig, origin: &Url, store: Arc<LocalStore>) -> Result<Self> {
        let base_url = resolve_base_url(origin)?;
        Self::with_config_and_base_url(config, base_url.as_str(), store)
    }

    /// Client with an explicit base URL, bypassing the hostname heuristic
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        store: Arc<LocalStore>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            store,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// Relative endpoints (leading `/`) hang off the base; anything else is absolute
    pub fn resolve(&self, endpoint: &str) -> Result<Url> {
        if endpoint.starts_with('/') {
            let base = self.base_url.as_str().trim_end_matches('/');
            Ok(Url::parse(&format!("{base}{endpoint}"))?)
        } else {
            Ok(Url::parse(endpoint)?)
        }
    }

    /// Bare request builder for callers that handle the response themselves
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.resolve(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    fn bearer_token(&self, auth: bool) -> Option<String> {
        if !auth {
            return None;
        }
        self.store.get_item(keys::TOKEN).filter(|token| !token.is_empty())
    }

    /// Issue one request and fold every outcome into an `ApiResponse`.
    ///
    /// Never fails: transport errors and non-2xx statuses both come back
    /// with `success == false`.
    pub async fn call_api(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        auth: bool,
    ) -> ApiResponse {
        let url = match self.resolve(endpoint) {
            Ok(url) => url,
            Err(err) => {
                error!(%method, endpoint, error = %err, "invalid API endpoint");
                return ApiResponse::failed(None, err.to_string());
            }
        };

        let mut builder = self
            .http_client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.bearer_token(auth) {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                error!(%method, endpoint, error = %err, "API call failed");
                return ApiResponse::failed(None, err.to_string());
            }
        };

        let status = response.status();
        let result = match read_body(response).await {
            Ok(result) => result,
            Err(err) => {
                error!(%method, endpoint, error = %err, "failed to read API response");
                return ApiResponse::failed(Some(status.as_u16()), err.to_string());
            }
        };

        if !status.is_success() {
            let message = result.error_message();
            error!(%method, endpoint, status = status.as_u16(), %message, "API call returned error status");
            return ApiResponse::failed(Some(status.as_u16()), message);
        }

        debug!(%method, endpoint, status = status.as_u16(), "API call succeeded");
        ApiResponse::ok(status.as_u16(), result)
    }
}

/// JSON when the content type says so, text otherwise
pub(crate) async fn read_body(response: Response) -> Result<ResponseBody> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let text = response.text().await?;
    if is_json {
        if text.trim().is_empty() {
            return Ok(ResponseBody::Json(serde_json::Value::Null));
        }
        Ok(ResponseBody::Json(serde_json::from_str(&text)?))
    } else {
        Ok(ResponseBody::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:5173", true)]
    #[case("https://localdev.dimo.org:3008", true)]
    #[case("https://trips.dimo.org", false)]
    #[case("http://127.0.0.1:3007", false)]
    fn test_resolve_base_url_by_hostname(#[case] origin: &str, #[case] local: bool) {
        let origin = Url::parse(origin).unwrap();
        let base = resolve_base_url(&origin).unwrap();
        if local {
            assert_eq!(base.as_str(), "https://localdev.dimo.org:3007/");
        } else {
            assert_eq!(base, origin);
        }
    }

    #[test]
    fn test_resolve_base_url_drops_origin_path() {
        let origin = Url::parse("https://trips.dimo.org:8443/app/login.html?next=1").unwrap();
        let base = resolve_base_url(&origin).unwrap();
        assert_eq!(base.as_str(), "https://trips.dimo.org:8443/");
    }

    #[test]
    fn test_resolve_relative_and_absolute_endpoints() {
        let client = ApiClient::with_config_and_base_url(
            ClientConfig::default(),
            "https://trips.dimo.org/app/",
            Arc::new(LocalStore::in_memory()),
        )
        .unwrap();

        assert_eq!(
            client.resolve("/v1/settings").unwrap().as_str(),
            "https://trips.dimo.org/app/v1/settings"
        );
        assert_eq!(
            client
                .resolve("https://accounts.dimo.org/api/account/a@b.c")
                .unwrap()
                .as_str(),
            "https://accounts.dimo.org/api/account/a@b.c"
        );
    }

    #[test]
    fn test_bearer_token_requires_opt_in_and_presence() {
        let store = Arc::new(LocalStore::in_memory());
        let client = ApiClient::with_config_and_base_url(
            ClientConfig::default(),
            "https://trips.dimo.org",
            store.clone(),
        )
        .unwrap();

        assert!(client.bearer_token(true).is_none());
        store.set_item(keys::TOKEN, "jwt").unwrap();
        assert!(client.bearer_token(false).is_none());
        assert_eq!(client.bearer_token(true), Some("jwt".to_string()));
    }
}

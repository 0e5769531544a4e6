/*
[INPUT]:  Public settings, SDK configuration, app origin
[OUTPUT]: Login URLs and the post-login redirect target
[POS]:    Login layer - what the login widgets link to and navigate to
[UPDATE]: When the login page parameters or vehicles route change
*/

use std::fmt;

use tracing::warn;
use url::Url;

use crate::http::Result;
use crate::types::{Environment, LoginMode, PublicSettings};

/// Route every successful login lands on
pub const VEHICLES_PATH: &str = "/vehicles/me";

/// Page the login service sends the user back to
pub const LOGIN_RETURN_PATH: &str = "/login.html";

const ENTRY_STATE: &str = "EMAIL_INPUT";

/// Full-page navigation target (not an in-app route change)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect(Url);

impl Redirect {
    /// `{base}/vehicles/me`
    pub fn vehicles(base: &Url) -> Result<Self> {
        let base = base.as_str().trim_end_matches('/');
        Ok(Self(Url::parse(&format!("{base}{VEHICLES_PATH}"))?))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Link to the hosted login page, if the settings carry a usable client id.
///
/// `None` is the "no client id configured" case. The client id must be a
/// `0x`-prefixed 40-digit hex address, stricter than a bare length check,
/// and `redirectUri` is URL-encoded. Only the scheme, host and port of
/// `origin` are used.
pub fn login_link(settings: &PublicSettings, origin: &Url) -> Option<Url> {
    if !settings.has_valid_client_id() {
        return None;
    }
    let mut url = match Url::parse(&settings.login_url) {
        Ok(url) => url,
        Err(err) => {
            warn!(login_url = %settings.login_url, error = %err, "login url is not a valid URL");
            return None;
        }
    };

    let origin = origin.origin().ascii_serialization();
    url.query_pairs_mut()
        .append_pair("clientId", &settings.client_id)
        .append_pair("redirectUri", &format!("{origin}{LOGIN_RETURN_PATH}"))
        .append_pair("entryState", ENTRY_STATE);
    Some(url)
}

/// Parameters the login SDK is initialised with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLoginRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub api_key: String,
    pub environment: Environment,
    pub permission_template_id: Option<String>,
    pub mode: LoginMode,
}

impl SdkLoginRequest {
    /// Hosted login base for the environment
    pub fn login_base(&self) -> &'static str {
        match self.environment {
            Environment::Production => "https://login.dimo.org",
            Environment::Development => "https://login.dev.dimo.org",
        }
    }

    /// URL the popup (or redirect) opens. The API key never leaves the app.
    pub fn login_url(&self) -> Result<Url> {
        let mut url = Url::parse(self.login_base())?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("clientId", &self.client_id)
                .append_pair("redirectUri", &self.redirect_uri)
                .append_pair("entryState", ENTRY_STATE);
            if let Some(template) = &self.permission_template_id {
                query.append_pair("permissionTemplateId", template);
            }
            if self.mode == LoginMode::Popup {
                query.append_pair("transport", "popup");
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CLIENT_ID: &str = "0x1111111111111111111111111111111111111111";

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_vehicles_redirect() {
        let base = Url::parse("https://trips.dimo.org/").unwrap();
        let redirect = Redirect::vehicles(&base).unwrap();
        assert_eq!(redirect.to_string(), "https://trips.dimo.org/vehicles/me");
    }

    #[test]
    fn test_login_link_with_valid_client_id() {
        let settings = PublicSettings {
            client_id: CLIENT_ID.to_string(),
            login_url: "https://login.dimo.org".to_string(),
        };
        let origin = Url::parse("https://trips.dimo.org").unwrap();

        let link = login_link(&settings, &origin).unwrap();
        let params = query(&link);
        assert_eq!(link.host_str(), Some("login.dimo.org"));
        assert_eq!(params["clientId"], CLIENT_ID);
        assert_eq!(params["redirectUri"], "https://trips.dimo.org/login.html");
        assert_eq!(params["entryState"], "EMAIL_INPUT");
    }

    #[test]
    fn test_login_link_ignores_origin_path() {
        let settings = PublicSettings {
            client_id: CLIENT_ID.to_string(),
            login_url: "https://login.dimo.org".to_string(),
        };
        let origin = Url::parse("https://trips.dimo.org:8443/app/index.html?x=1").unwrap();

        let link = login_link(&settings, &origin).unwrap();
        assert_eq!(
            query(&link)["redirectUri"],
            "https://trips.dimo.org:8443/login.html"
        );
    }

    #[test]
    fn test_login_link_requires_client_id() {
        let settings = PublicSettings {
            client_id: String::new(),
            login_url: "https://login.dimo.org".to_string(),
        };
        let origin = Url::parse("https://trips.dimo.org").unwrap();
        assert!(login_link(&settings, &origin).is_none());
    }

    #[test]
    fn test_sdk_login_url_omits_api_key() {
        let request = SdkLoginRequest {
            client_id: CLIENT_ID.to_string(),
            redirect_uri: "https://trips.dimo.org/login.html".to_string(),
            api_key: "secret".to_string(),
            environment: Environment::Development,
            permission_template_id: Some("1".to_string()),
            mode: LoginMode::Popup,
        };

        let url = request.login_url().unwrap();
        let params = query(&url);
        assert_eq!(url.host_str(), Some("login.dev.dimo.org"));
        assert_eq!(params["permissionTemplateId"], "1");
        assert!(!url.as_str().contains("secret"));
    }
}

/*
[INPUT]:  Wire values and configuration tags
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - enumerations shared by auth and configuration
[UPDATE]: When new auth flows, modes or environments are introduced
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Process-wide authentication status observed by the login front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            AuthStatus::Unauthenticated => "unauthenticated",
            AuthStatus::Authenticating => "authenticating",
            AuthStatus::Authenticated => "authenticated",
        };
        f.write_str(value)
    }
}

/// How the login SDK presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    #[default]
    Popup,
    Redirect,
}

impl LoginMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LoginMode::Popup => "popup",
            LoginMode::Redirect => "redirect",
        }
    }
}

/// Deployment environment tag passed to the login SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "prod")]
    Production,
    #[serde(alias = "dev")]
    Development,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

/// The single authentication flow an app instance runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthFlow {
    /// Wallet signs a backend-issued challenge
    #[default]
    Wallet,
    /// Login SDK popup/redirect hands over a JWT
    Sdk,
    /// Plain login link built from public settings
    JwtLink,
}

impl AuthFlow {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthFlow::Wallet => "wallet",
            AuthFlow::Sdk => "sdk",
            AuthFlow::JwtLink => "jwt-link",
        }
    }
}

impl fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wallet" => Ok(AuthFlow::Wallet),
            "sdk" => Ok(AuthFlow::Sdk),
            "jwt-link" | "jwt_link" => Ok(AuthFlow::JwtLink),
            other => Err(format!("unknown auth flow: {other}")),
        }
    }
}

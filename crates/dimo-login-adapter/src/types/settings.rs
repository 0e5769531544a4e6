/*
[INPUT]:  Settings and account payloads returned by the backend
[OUTPUT]: Typed settings structs with camelCase wire names
[POS]:    Data layer - cached configuration blobs
[UPDATE]: When the settings endpoints change shape
*/

use serde::{Deserialize, Serialize};

/// Length of a `0x`-prefixed 20-byte hex address
pub const ADDRESS_LEN: usize = 42;

/// Settings served without authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    /// Developer license address, `0x` + 40 hex chars
    pub client_id: String,
    pub login_url: String,
}

impl PublicSettings {
    /// True when `client_id` looks like a hex address
    pub fn has_valid_client_id(&self) -> bool {
        is_hex_address(&self.client_id)
    }
}

/// Settings served behind the bearer token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateSettings {
    pub devices_api_url: Option<String>,
    pub accounts_api_url: Option<String>,
    pub paymaster_url: Option<String>,
    pub rpc_url: Option<String>,
    pub bundler_url: Option<String>,
    pub environment: Option<String>,
    pub turnkey_org_id: Option<String>,
    pub turnkey_api_url: Option<String>,
    pub turnkey_rp_id: Option<String>,
}

/// Passkey account record from the accounts API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub sub_organization_id: String,
    #[serde(default)]
    pub is_deployed: bool,
    #[serde(default)]
    pub has_passkey: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub authenticators: Vec<serde_json::Value>,
}

pub(crate) fn is_hex_address(value: &str) -> bool {
    value.len() == ADDRESS_LEN
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

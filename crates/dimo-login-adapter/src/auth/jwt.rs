/*
[INPUT]:  JWT strings handed over by the login SDK
[OUTPUT]: Stored token, unverified claims and expiration status
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When claim names or storage strategy change
*/

use std::sync::{Arc, RwLock};

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::http::{LoginError, Result};
use crate::storage::{LocalStore, keys};

/// Stored token data with metadata
#[derive(Debug, Clone)]
pub struct TokenData {
    pub token: String,
    /// From the `exp` claim; `None` when the token carries no expiry
    pub expires_at: Option<DateTime<Utc>>,
    /// From the `ethereum_address` claim
    pub ethereum_address: Option<String>,
}

impl TokenData {
    /// Decode claims without verifying the signature
    pub fn from_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        let expires_at = claims
            .get("exp")
            .and_then(|value| value.as_i64())
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0));
        let ethereum_address = claims
            .get("ethereum_address")
            .and_then(|value| value.as_str())
            .map(str::to_string);

        Ok(Self {
            token,
            expires_at,
            ethereum_address,
        })
    }

    /// Token kept as-is, with no claims read from it
    pub fn opaque(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
            ethereum_address: None,
        }
    }

    /// Decode claims when possible, else keep the token opaque
    fn lenient(token: String) -> Self {
        match Self::from_token(token.clone()) {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "token claims unreadable; keeping it opaque");
                Self::opaque(token)
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() > expires_at)
    }
}

/// Thread-safe JWT token manager, mirrored into the local store
#[derive(Debug, Clone)]
pub struct JwtManager {
    data: Arc<RwLock<Option<TokenData>>>,
    store: Arc<LocalStore>,
}

impl JwtManager {
    /// Create a manager, picking up a previously stored token
    pub fn new(store: Arc<LocalStore>) -> Self {
        let data = store.get_item(keys::TOKEN).map(TokenData::lenient);
        Self {
            data: Arc::new(RwLock::new(data)),
            store,
        }
    }

    /// Store a new token.
    ///
    /// The token is stored verbatim; claims are read only when it is a
    /// decodable JWT. The only error is a failed store write.
    pub fn set_token(&self, token: impl Into<String>) -> Result<TokenData> {
        let token_data = TokenData::lenient(token.into());
        self.store.set_item(keys::TOKEN, token_data.token.clone())?;

        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token_data.clone());
        Ok(token_data)
    }

    /// Get the current token if available
    pub fn get_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|data| data.token.clone())
    }

    /// Current token, unless its `exp` has passed
    pub fn valid_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|data| !data.is_expired())
            .map(|data| data.token.clone())
    }

    /// Check if token is expired (or absent)
    pub fn is_expired(&self) -> bool {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().is_none_or(TokenData::is_expired)
    }

    /// Get token data if available
    pub fn token_data(&self) -> Option<TokenData> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Clear the stored token
    pub fn clear(&self) -> Result<()> {
        self.store.remove_item(keys::TOKEN)?;
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

/// `ethereum_address` claim of `token`, signature unchecked
pub fn extract_ethereum_address(token: &str) -> Result<String> {
    TokenData::from_token(token)?
        .ethereum_address
        .ok_or_else(|| LoginError::InvalidToken("ethereum address not found in JWT".to_string()))
}

fn decode_claims(token: &str) -> Result<serde_json::Value> {
    let payload_b64 = token
        .trim()
        .split('.')
        .nth(1)
        .ok_or_else(|| LoginError::InvalidToken("not a JWT".to_string()))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| URL_SAFE.decode(payload_b64))
        .map_err(|e| LoginError::InvalidToken(format!("invalid JWT payload base64: {e}")))?;

    let claims: serde_json::Value = serde_json::from_slice(&payload_bytes)
        .map_err(|e| LoginError::InvalidToken(format!("invalid JWT payload: {e}")))?;
    if !claims.is_object() {
        return Err(LoginError::InvalidToken("JWT payload is not an object".to_string()));
    }
    Ok(claims)
}

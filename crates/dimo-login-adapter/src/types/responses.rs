/*
[INPUT]:  Raw HTTP response bodies and status codes
[OUTPUT]: Uniform success/failure result and typed payloads
[POS]:    Data layer - response shapes returned to callers
[UPDATE]: When the API client's result contract changes
*/

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::http::{LoginError, Result};

/// Response body, decoded according to its content type
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Decode the body into `T`. Text bodies are parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            ResponseBody::Json(value) => Ok(T::deserialize(value)?),
            ResponseBody::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }

    /// Message to report when this body came with an error status
    pub(crate) fn error_message(&self) -> String {
        match self {
            ResponseBody::Json(value) => match value.get("message").and_then(|m| m.as_str()) {
                Some(message) if !message.is_empty() => message.to_string(),
                _ if value.is_null() => "HTTP error".to_string(),
                _ => value.to_string(),
            },
            ResponseBody::Text(text) if !text.is_empty() => text.clone(),
            ResponseBody::Text(_) => "HTTP error".to_string(),
        }
    }
}

/// Result of `ApiClient::call_api`.
///
/// `data` is only populated when `success` is true. `status` is absent when
/// the request never produced a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<ResponseBody>,
    pub error: Option<String>,
    pub status: Option<u16>,
}

impl ApiResponse {
    pub(crate) fn ok(status: u16, data: ResponseBody) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: Some(status),
        }
    }

    pub(crate) fn failed(status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status,
        }
    }

    /// Convert into a `Result`, keeping the body on success
    pub fn into_result(self) -> Result<ResponseBody> {
        if self.success {
            if let Some(data) = self.data {
                return Ok(data);
            }
        }
        let message = self.error.unwrap_or_else(|| "HTTP error".to_string());
        Err(LoginError::Http {
            status: self.status.unwrap_or_default(),
            message,
        })
    }

    /// Decode a successful body into `T`
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        self.into_result()?.json()
    }
}

/// Challenge pair issued by `generate_challenge`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeMessage {
    /// Correlates the verification call with this challenge
    pub state: String,
    /// Exact text the wallet signs
    pub challenge: String,
}

/// Reply of `POST /login-jwt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtSessionResponse {
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = ResponseBody::Json(serde_json::json!({"message": "nope", "code": 7}));
        assert_eq!(body.error_message(), "nope");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let body = ResponseBody::Json(serde_json::json!({"code": 7}));
        assert_eq!(body.error_message(), r#"{"code":7}"#);

        let body = ResponseBody::Text("upstream down".to_string());
        assert_eq!(body.error_message(), "upstream down");

        let body = ResponseBody::Text(String::new());
        assert_eq!(body.error_message(), "HTTP error");
    }

    #[test]
    fn test_into_result_failure_carries_status() {
        let response = ApiResponse::failed(Some(404), "missing");
        match response.into_result().unwrap_err() {
            LoginError::Http { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_text_body_decodes_as_json() {
        let body = ResponseBody::Text(r#"{"state":"S","challenge":"C"}"#.to_string());
        let message: ChallengeMessage = body.json().unwrap();
        assert_eq!(message.state, "S");
    }
}

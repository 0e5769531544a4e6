/*
[INPUT]:  Bearer token (optional) and account email
[OUTPUT]: Raw settings/account API responses
[POS]:    HTTP layer - settings and account endpoints
[UPDATE]: When settings endpoints or their auth requirements change
*/

use reqwest::Method;

use crate::http::ApiClient;
use crate::types::ApiResponse;

impl ApiClient {
    /// GET /v1/public/settings
    pub async fn get_public_settings(&self) -> ApiResponse {
        self.call_api(Method::GET, "/v1/public/settings", None, true)
            .await
    }

    /// GET /v1/settings (bearer)
    pub async fn get_private_settings(&self) -> ApiResponse {
        self.call_api(Method::GET, "/v1/settings", None, true).await
    }

    /// GET {accounts_api_url}/api/account/{email}
    pub async fn get_account_info(&self, accounts_api_url: &str, email: &str) -> ApiResponse {
        let endpoint = format!(
            "{}/api/account/{}",
            accounts_api_url.trim_end_matches('/'),
            email
        );
        self.call_api(Method::GET, &endpoint, None, false).await
    }

    /// GET /api/logout
    pub async fn logout(&self) -> ApiResponse {
        self.call_api(Method::GET, "/api/logout", None, false).await
    }
}

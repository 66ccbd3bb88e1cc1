// Remote API client
//
// Thin typed wrapper over the backend's JSON endpoints. Every call is a POST;
// authenticated calls carry `Authorization: Bearer <token>`. No retries here,
// callers decide what to do with a failure.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::models::{
    AnalyticsResponse, ApiKeysResponse, ApiLogsResponse, CheckoutSessionResponse,
    GenerateApiKeyResponse, LoginResponse, MessageResponse, OverviewResponse, RegisterResponse,
    UsageRecord, UserSettings, UserSettingsResponse,
};
use crate::utils::{AppError, HttpClient, Result};

/// Backend API client
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured base URL
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = HttpClient::new(settings)?;
        Ok(Self::with_http_client(http, &settings.api.base_url))
    }

    /// Create a client over an existing HTTP client
    pub fn with_http_client(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(token: &str) -> Result<HeaderMap> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::ValidationError("Auth token is not a valid header value".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// POST a JSON body and decode the JSON reply
    ///
    /// Non-2xx replies are turned into errors using the body's `error` field,
    /// or `fallback` when the body has none.
    async fn post<B, T>(&self, path: &str, token: Option<&str>, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("➡️  POST {}", url);

        let response = match token {
            Some(token) => {
                let headers = Self::auth_headers(token)?;
                self.http.post_json_with_headers(&url, headers, body).await?
            }
            None => self.http.post_json(&url, body).await?,
        };

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());

            warn!("❌ POST {} failed with status {}: {}", path, status.as_u16(), message);
            return Err(AppError::from_status(status.as_u16(), message));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::ApiError(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    // ========================================
    // Account
    // ========================================

    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<RegisterResponse> {
        let body = json!({
            "name": name,
            "email": email,
            "username": username,
            "password": password,
        });
        self.post("/api/register", None, &body, "Registration failed")
            .await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self.post("/api/login", None, &body, "Login failed").await?;
        debug!("🔐 Logged in as user {}", response.user.user_id_string());
        Ok(response)
    }

    pub async fn verify_email_code(
        &self,
        user_id: &str,
        verification_code: &str,
    ) -> Result<MessageResponse> {
        let body = json!({ "user_id": user_id, "verification_code": verification_code });
        self.post("/api/verify_email", None, &body, "Failed to verify email")
            .await
    }

    pub async fn change_password(
        &self,
        token: &str,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse> {
        let body = json!({
            "user_id": user_id,
            "current_password": current_password,
            "new_password": new_password,
        });
        self.post("/change_password", Some(token), &body, "Failed to change password")
            .await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse> {
        let body = json!({ "email": email });
        self.post(
            "/api/forgot_password",
            None,
            &body,
            "Failed to request password reset.",
        )
        .await
    }

    pub async fn confirm_password_reset(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<MessageResponse> {
        let body = json!({ "reset_token": reset_token, "new_password": new_password });
        self.post("/api/reset_password", None, &body, "Password reset failed.")
            .await
    }

    // ========================================
    // API keys
    // ========================================

    pub async fn generate_api_key(&self, token: &str, user_id: &str) -> Result<GenerateApiKeyResponse> {
        let body = json!({ "user_id": user_id });
        self.post("/api/generate_api_key", Some(token), &body, "Failed to generate API key")
            .await
    }

    pub async fn get_api_keys(&self, token: &str, user_id: &str) -> Result<ApiKeysResponse> {
        let body = json!({ "user_id": user_id });
        self.post("/api/get_api_keys", Some(token), &body, "Failed to retrieve API keys")
            .await
    }

    // ========================================
    // Usage
    // ========================================

    /// Raw usage records for a time range such as `"7d"`
    ///
    /// A success reply that still carries an `error` field is treated as a
    /// failure.
    pub async fn get_analytics_data(&self, token: &str, time_range: &str) -> Result<Vec<UsageRecord>> {
        let body = json!({ "time_range": time_range });
        let response: AnalyticsResponse = self
            .post("/api/analytics", Some(token), &body, "Failed to retrieve analytics")
            .await?;

        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(AppError::ApiError(error));
        }

        debug!("📥 Received {} usage records for {}", response.analytics.len(), time_range);
        Ok(response.analytics)
    }

    pub async fn get_api_logs(&self, token: &str, page: u32, per_page: u32) -> Result<ApiLogsResponse> {
        let body = json!({ "page": page, "per_page": per_page });
        self.post("/api/logs", Some(token), &body, "Failed to retrieve API logs")
            .await
    }

    pub async fn get_overview_data(&self, token: &str, time_range: &str) -> Result<OverviewResponse> {
        let body = json!({ "time_range": time_range });
        self.post("/api/overview", Some(token), &body, "Failed to retrieve overview data")
            .await
    }

    // ========================================
    // Settings
    // ========================================

    pub async fn get_user_settings(&self, token: &str) -> Result<UserSettingsResponse> {
        self.post("/api/get_settings", Some(token), &json!({}), "Failed to retrieve user settings")
            .await
    }

    pub async fn update_user_settings(
        &self,
        token: &str,
        settings: &UserSettings,
    ) -> Result<MessageResponse> {
        let body = json!({ "settings": settings });
        self.post("/api/update_settings", Some(token), &body, "Failed to update user settings")
            .await
    }

    // ========================================
    // Payments
    // ========================================

    /// Start a checkout for a number of credits
    pub async fn create_checkout_session(
        &self,
        token: &str,
        credits: f64,
    ) -> Result<CheckoutSessionResponse> {
        if !credits.is_finite() || credits <= 0.0 {
            return Err(AppError::ValidationError(format!(
                "Credits must be a positive number, got {}",
                credits
            )));
        }

        let body = json!({ "credits": credits });
        self.post(
            "/payments/create-checkout-session",
            Some(token),
            &body,
            "Failed to create checkout session",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::create_test_settings;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let settings = create_test_settings();
        let http = HttpClient::new(&settings).unwrap();
        let client = ApiClient::with_http_client(http, "http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/api/login"), "http://localhost:8000/api/login");
    }

    #[test]
    fn test_new_fails_on_bad_proxy_setting() {
        let mut settings = create_test_settings();
        settings.api.proxy_url = Some("not a proxy url".to_string());
        assert!(matches!(ApiClient::new(&settings), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_auth_headers() {
        let headers = ApiClient::auth_headers("abc.def").unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc.def");

        let bad = ApiClient::auth_headers("line\nbreak");
        assert!(matches!(bad, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_checkout_rejects_non_positive_credits() {
        let settings = create_test_settings();
        let client = ApiClient::new(&settings).unwrap();

        for credits in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = client.create_checkout_session("token", credits).await;
            assert!(matches!(result, Err(AppError::ValidationError(_))));
        }
    }
}

// Remote API payloads
//
// Response bodies returned by the Quality Compute backend. Fields the client
// does not interpret are kept optional so new server fields do not break
// decoding.

use serde::{Deserialize, Serialize};

use super::usage_record::{null_as_default, UsageRecord};

/// Generic `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl UserInfo {
    /// User id as text; the backend may send it as a number or a string
    pub fn user_id_string(&self) -> String {
        match &self.user_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserInfo,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateApiKeyResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    pub api_key: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeysResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub analytics: Vec<UsageRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One request in the call history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLog {
    #[serde(default)]
    pub log_id: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub tokens_in: Option<i64>,
    #[serde(default)]
    pub tokens_out: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Same row shape is used for recent calls on the overview page
pub type RecentCall = ApiLog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLogsResponse {
    #[serde(default)]
    pub logs: Vec<ApiLog>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credits: f64,
    #[serde(default, alias = "apiCalls")]
    pub api_calls: Option<i64>,
    #[serde(default, alias = "recentCalls")]
    pub recent_calls: Vec<RecentCall>,
    #[serde(default, alias = "usageByModel")]
    pub usage_by_model: serde_json::Value,
    #[serde(default, alias = "dailyUsage")]
    pub daily_usage: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(default)]
    pub organization_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub email_alerts: bool,
    #[serde(default)]
    pub low_credit_threshold: f64,
    #[serde(default)]
    pub usage_reports: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub account: AccountSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettingsResponse {
    #[serde(default)]
    pub settings: UserSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_numeric_user_id() {
        let json = r#"{
            "message": "Login successful",
            "user": { "user_id": 42, "name": "Ada", "email": "ada@example.com", "username": "ada" },
            "token": "jwt-token"
        }"#;

        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "jwt-token");
        assert_eq!(resp.user.user_id_string(), "42");
    }

    #[test]
    fn test_analytics_tolerates_null_list_and_bad_rows() {
        let empty: AnalyticsResponse = serde_json::from_str(r#"{"analytics": null}"#).unwrap();
        assert!(empty.analytics.is_empty());

        let json = r#"{"analytics": [
            {"time_bucket": "2024-03-01T10:00:00Z", "model": "o3", "input_tokens": 1},
            {"time_bucket": null, "model": "o3", "input_tokens": 2},
            {"model": "o3", "input_tokens": 3}
        ]}"#;
        let resp: AnalyticsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.analytics.len(), 3);
        assert_eq!(resp.analytics[1].time_bucket, "");
    }

    #[test]
    fn test_overview_accepts_camel_case_fields() {
        let json = r#"{
            "name": "Ada",
            "credits": 12.5,
            "apiCalls": 3,
            "recentCalls": [
                { "log_id": 1, "timestamp": "2024-03-01T10:00:00Z", "model_used": "o4-mini-B10",
                  "tokens_in": 100, "tokens_out": 20, "status": "success" }
            ]
        }"#;

        let resp: OverviewResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.credits, 12.5);
        assert_eq!(resp.api_calls, Some(3));
        assert_eq!(resp.recent_calls.len(), 1);
        assert_eq!(
            resp.recent_calls[0].model_used.as_deref(),
            Some("o4-mini-B10")
        );
    }

    #[test]
    fn test_checkout_session_aliases() {
        let resp: CheckoutSessionResponse =
            serde_json::from_str(r#"{ "sessionId": "cs_1", "url": "https://pay.example/cs_1" }"#)
                .unwrap();
        assert_eq!(resp.session_id.as_deref(), Some("cs_1"));
        assert_eq!(resp.url.as_deref(), Some("https://pay.example/cs_1"));
    }
}

use reqwest::{header::HeaderMap, Client, Proxy};
use std::time::Duration;

use crate::config::Settings;
use crate::utils::{AppError, Result};

/// HTTP client wrapper shared by the API client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client honoring the configured timeout and proxy
    ///
    /// Without `api.proxy_url`, system proxy settings from the environment
    /// are picked up by reqwest.
    pub fn new(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_millis(settings.api.request_timeout);

        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("quality-compute/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = settings.api.proxy_url.as_deref().filter(|p| !p.is_empty()) {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| AppError::ConfigError(format!("Failed to configure proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Make a POST request with JSON body
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("POST request failed: {}", e)))
    }

    /// Make a POST request with custom headers and JSON body
    pub async fn post_json_with_headers<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<reqwest::Response> {
        self.client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("POST request failed: {}", e)))
    }
}
